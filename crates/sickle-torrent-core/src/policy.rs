//! Normalisation of label and seed-ratio settings ahead of dispatch.

use sickle_config::{LabelSettings, SEED_FOREVER_RATIO, label_is_valid};

use crate::error::PolicyViolation;

/// Pick the label for a result and normalise it.
///
/// Anime shows always use the anime label, even when it is empty. Returns
/// `Ok(None)` when there is nothing to apply.
///
/// # Errors
///
/// Returns [`PolicyViolation::LabelContainsSpace`] when the selected label contains a space.
pub fn resolve_label(
    labels: &LabelSettings,
    is_anime: bool,
) -> Result<Option<String>, PolicyViolation> {
    let raw = if is_anime {
        &labels.anime
    } else {
        &labels.normal
    };
    let label = raw.to_lowercase();
    if !label_is_valid(&label) {
        return Err(PolicyViolation::LabelContainsSpace { label });
    }
    Ok(Some(label).filter(|label| !label.is_empty()))
}

/// What to tell the client about seeding limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioPlan {
    /// No ratio configured; the client's own default applies.
    ClientDefault,
    /// Stop seeding once the share ratio reaches the threshold.
    StopAt(f64),
    /// Disable stop-at-ratio entirely.
    SeedForever,
}

impl RatioPlan {
    /// Classify a configured ratio.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation::UnsupportedRatio`] for non-finite values and
    /// negatives other than `-1`.
    pub fn from_ratio(ratio: Option<f64>) -> Result<Self, PolicyViolation> {
        let Some(ratio) = ratio else {
            return Ok(Self::ClientDefault);
        };
        #[allow(clippy::float_cmp)]
        let seed_forever = ratio == SEED_FOREVER_RATIO;
        if seed_forever {
            Ok(Self::SeedForever)
        } else if ratio.is_finite() && ratio >= 0.0 {
            Ok(Self::StopAt(ratio))
        } else {
            Err(PolicyViolation::UnsupportedRatio { ratio })
        }
    }
}
