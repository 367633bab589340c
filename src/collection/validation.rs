// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turning `validator` errors into the single message a form shows.

use validator::{Validate, ValidationError, ValidationErrors};

/// Validate `form` and return the message of the first failing field in `order`.
///
/// Fields not listed in `order` are checked afterwards, alphabetically, so the
/// result is deterministic even though `validator` reports errors in a map.
pub fn first_error<F: Validate>(form: &F, order: &[&str]) -> Option<String> {
    let errors = form.validate().err()?;
    Some(pick_message(&errors, order))
}

fn pick_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let fields = errors.field_errors();
    let mut entries: Vec<(&str, &Vec<ValidationError>)> =
        fields.iter().map(|(k, v)| (k.as_ref(), *v)).collect();
    entries.sort_by_key(|(name, _)| {
        (
            order.iter().position(|o| o == name).unwrap_or(usize::MAX),
            *name,
        )
    });

    entries
        .first()
        .and_then(|(_, errs)| errs.first())
        .map(|err| match &err.message {
            Some(message) => message.to_string(),
            None => format!("Campo inválido ({}).", err.code),
        })
        .unwrap_or_else(|| "Formulário inválido.".to_string())
}
