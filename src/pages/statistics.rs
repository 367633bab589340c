// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics screen: one bar pair per anonymized user, with a search box
//! that highlights and scrolls to the first matching bar.

use crate::collection::Flash;
use crate::error::Result;
use crate::models::stats::{self, Bar, GeneralStat};
use crate::services::ApiClient;
use crate::AppState;

const LOAD_FAILED: &str = "Erro ao carregar estatísticas.";

pub struct StatisticsPage {
    api: ApiClient,
    stats: Vec<GeneralStat>,
    search: String,
    highlighted: Option<usize>,
    page_error: Flash,
}

impl StatisticsPage {
    pub async fn mount(state: &AppState) -> Result<Self> {
        state.session.require_actor()?;

        let mut page = Self {
            api: state.api.clone(),
            stats: Vec::new(),
            search: String::new(),
            highlighted: None,
            page_error: Flash::new(state.config.flash_window),
        };
        if let Err(e) = page.load().await {
            tracing::warn!(error = %e, "Initial statistics fetch failed");
        }
        Ok(page)
    }

    /// Fetch `GET /stats/general`. The search is re-applied to the new data.
    pub async fn load(&mut self) -> Result<()> {
        match self.api.get_json("/stats/general", &[]).await {
            Ok(stats) => {
                self.stats = stats;
                self.rehighlight();
                Ok(())
            }
            Err(e) => {
                self.page_error.set(LOAD_FAILED);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> &[GeneralStat] {
        &self.stats
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Update the search term and move the highlight.
    ///
    /// Returns the highlighted index, if any entry matches. A blank term
    /// highlights nothing.
    pub fn set_search(&mut self, term: impl Into<String>) -> Option<usize> {
        self.search = term.into();
        self.rehighlight();
        self.highlighted
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn bars(&self) -> Vec<Bar<'_>> {
        stats::bars(&self.stats, self.highlighted)
    }

    /// Scroll position that centers the highlighted bar; `None` leaves the
    /// chart where it is.
    pub fn scroll_offset(&self, viewport_width: u32) -> Option<u32> {
        self.highlighted
            .map(|index| stats::scroll_offset(index, viewport_width))
    }

    pub fn page_error(&self) -> Option<String> {
        self.page_error.message()
    }

    fn rehighlight(&mut self) {
        let term = self.search.trim();
        self.highlighted = if term.is_empty() {
            None
        } else {
            stats::find_first_match(&self.stats, term)
        };
        tracing::debug!(search = %self.search, highlighted = ?self.highlighted, "Statistics highlight");
    }
}
