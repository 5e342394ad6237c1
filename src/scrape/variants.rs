//! Variant enumeration through a re-rendering dropdown.
//!
//! The dropdown (select2 on WooCommerce) rebuilds its option list every time
//! it opens, so option handles die with each interaction. Options are
//! therefore addressed by index: the enumerator counts them once, then for
//! each index reopens the control, re-reads the list and picks the `i`-th
//! entry.
//!
//! ```text
//! NoControl -> Done(empty)
//! ControlDetected -> Opening -> OptionsRead -> Closing
//!     -> [Opening -> OptionsRead -> OptionSelected -> FieldsCaptured]* -> Done
//! ```
//!
//! Any failure jumps to `Done` with whatever was collected so far.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::{ScraperConfig, Selectors};
use crate::error::{Error, Result};
use crate::session::{ElementHandle, PageSession};
use crate::wait::{WaitPolicy, poll_until};

use super::fields::{self, Displayed};
use super::record::VariantRecord;

// ============================================================================
// Phase
// ============================================================================

/// Step of the enumeration a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Looking for the variant control.
    Detecting,
    /// Clicking the control open.
    Opening,
    /// Reading the option list.
    OptionsRead,
    /// Clicking the control closed after counting.
    Closing,
    /// Picking an option.
    OptionSelected,
    /// Reading price and image of the picked variant.
    FieldsCaptured,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Detecting => "detecting",
            Self::Opening => "opening",
            Self::OptionsRead => "options-read",
            Self::Closing => "closing",
            Self::OptionSelected => "option-selected",
            Self::FieldsCaptured => "fields-captured",
        };
        f.write_str(name)
    }
}

/// An error tagged with the phase it stopped enumeration in.
#[derive(Debug)]
struct StepError {
    phase: Phase,
    error: Error,
}

trait AtPhase<T> {
    fn at(self, phase: Phase) -> std::result::Result<T, StepError>;
}

impl<T> AtPhase<T> for Result<T> {
    fn at(self, phase: Phase) -> std::result::Result<T, StepError> {
        self.map_err(|error| StepError { phase, error })
    }
}

type Step<T> = std::result::Result<T, StepError>;

// ============================================================================
// VariantEnumerator
// ============================================================================

/// Enumerates the variants of the product page a session is on.
#[derive(Debug, Clone)]
pub struct VariantEnumerator {
    selectors: Selectors,
    options_wait: WaitPolicy,
    selection_wait: WaitPolicy,
}

impl VariantEnumerator {
    /// Creates an enumerator using the configured selectors and waits.
    #[must_use]
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            selectors: config.selectors.clone(),
            options_wait: config.timing.options_wait(),
            selection_wait: config.timing.selection_wait(),
        }
    }

    /// Picks every variant in turn and records its label, price and image.
    ///
    /// Returns an empty list when the page has no variant control. A failure
    /// part-way stops enumeration and returns the records collected so far;
    /// it is logged, never returned.
    ///
    /// Leaves the page showing the last picked variant, so read the default
    /// state first.
    pub async fn enumerate<S: PageSession>(&self, session: &S, base: &Url) -> Vec<VariantRecord> {
        let mut records = Vec::new();
        self.collect_into(session, base, &mut records).await;
        records
    }

    /// Like [`enumerate`](Self::enumerate), but stops at `deadline` and
    /// returns the variants captured by then.
    pub async fn enumerate_until<S: PageSession>(
        &self,
        session: &S,
        base: &Url,
        deadline: Instant,
    ) -> Vec<VariantRecord> {
        let mut records = Vec::new();

        if timeout_at(deadline, self.collect_into(session, base, &mut records))
            .await
            .is_err()
        {
            warn!(
                url = %base,
                collected = records.len(),
                "Variant enumeration ran out of time"
            );
        }

        records
    }

    async fn collect_into<S: PageSession>(
        &self,
        session: &S,
        base: &Url,
        records: &mut Vec<VariantRecord>,
    ) {
        match self.detect(session).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(url = %base, "No variant control");
                return;
            }
            Err(failure) => {
                Self::log_stop(base, &failure, None, 0);
                return;
            }
        }

        let count = match self.count_options(session).await {
            Ok(count) => count,
            Err(failure) => {
                Self::log_stop(base, &failure, None, 0);
                return;
            }
        };
        debug!(url = %base, count, "Variant options counted");

        records.reserve(count);
        for index in 0..count {
            match self.capture(session, base, index).await {
                Ok(record) => {
                    trace!(index, name = %record.name, price = %record.price, "Variant captured");
                    records.push(record);
                }
                Err(failure) => {
                    Self::log_stop(base, &failure, Some(index), records.len());
                    break;
                }
            }
        }
    }

    fn log_stop(base: &Url, failure: &StepError, index: Option<usize>, collected: usize) {
        warn!(
            url = %base,
            phase = %failure.phase,
            index,
            collected,
            error = %failure.error,
            "Variant enumeration stopped early"
        );
    }

    async fn detect<S: PageSession>(&self, session: &S) -> Step<bool> {
        let control = session
            .find_first(&self.selectors.variant_current)
            .await
            .at(Phase::Detecting)?;
        Ok(control.is_some())
    }

    /// Opens the control, counts the settled options, closes it again.
    async fn count_options<S: PageSession>(&self, session: &S) -> Step<usize> {
        self.click_control(session).await.at(Phase::Opening)?;
        let count = self.settle_options(session).await;
        self.click_control(session).await.at(Phase::Closing)?;
        Ok(count)
    }

    /// Picks option `index` and reads what the page shows for it.
    async fn capture<S: PageSession>(
        &self,
        session: &S,
        base: &Url,
        index: usize,
    ) -> Step<VariantRecord> {
        self.click_control(session).await.at(Phase::Opening)?;
        self.settle_options(session).await;

        let option = session
            .find_all(&self.selectors.variant_options)
            .await
            .at(Phase::OptionsRead)?
            .into_iter()
            .nth(index)
            .ok_or_else(|| {
                Error::element_not_found(format!("{}[{index}]", self.selectors.variant_options))
            })
            .at(Phase::OptionsRead)?;
        let name = option.text().await.at(Phase::OptionsRead)?.trim().to_string();

        let before = Displayed::capture(session, &self.selectors).await;
        option.click().await.at(Phase::OptionSelected)?;
        self.settle_selection(session, before).await;

        let price = fields::read_price(session, &self.selectors)
            .await
            .at(Phase::FieldsCaptured)?;
        let image = fields::read_image(session, &self.selectors, base)
            .await
            .at(Phase::FieldsCaptured)?;

        Ok(VariantRecord {
            name,
            price,
            image: image.into(),
        })
    }

    /// Re-queries the control and clicks it; handles from before the last
    /// re-render are never reused.
    async fn click_control<S: PageSession>(&self, session: &S) -> Result<()> {
        let selector = &self.selectors.variant_current;
        match session.find_first(selector).await? {
            Some(control) => control.click().await,
            None => Err(Error::element_not_found(selector.as_str())),
        }
    }

    /// Waits until the option list is non-empty and two consecutive reads
    /// agree on its length. On timeout, the last count read (or 0).
    async fn settle_options<S: PageSession>(&self, session: &S) -> usize {
        let selector = self.selectors.variant_options.as_str();
        let mut previous = None;

        let outcome = poll_until(
            self.options_wait,
            move || async move { Ok::<_, Error>(session.find_all(selector).await?.len()) },
            move |count: &usize| {
                let stable = *count > 0 && previous == Some(*count);
                previous = Some(*count);
                stable
            },
        )
        .await;

        if !outcome.is_settled() {
            debug!(selector, "Option list did not settle");
        }
        outcome.into_last().unwrap_or(0)
    }

    /// Waits until price or image differs from `before`. Two variants may
    /// look identical, so running out of time is fine.
    async fn settle_selection<S: PageSession>(&self, session: &S, before: Displayed) {
        let selectors = &self.selectors;

        let outcome = poll_until(
            self.selection_wait,
            move || async move { Ok::<_, Error>(Displayed::capture(session, selectors).await) },
            |now: &Displayed| *now != before,
        )
        .await;

        if !outcome.is_settled() {
            debug!("Display unchanged after picking variant");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
