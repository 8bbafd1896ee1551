//! Pure derivation of a video's translation progress.
//!
//! Everything here is a side-effect-free function over the video's
//! translation records as loaded from the store, so status can be recomputed
//! on every read and never drifts from the underlying rows. Empty input
//! always yields an empty (or `Untranslated`) result, never an error.

use crate::domain::VideoStatus;
use crate::models::{Translation, Video};

/// The records representing completed primary translation work, in store
/// order. Review-pass records are not part of this sequence.
#[must_use]
pub fn completed_translations(translations: &[Translation]) -> Vec<Translation> {
    translations
        .iter()
        .filter(|t| !t.reviewer)
        .cloned()
        .collect()
}

/// One completed primary translation is enough; there is no approval
/// threshold on top of submission.
#[must_use]
pub fn is_translated(translations: &[Translation]) -> bool {
    translations.iter().any(|t| !t.reviewer)
}

/// Derives the status: untranslated without primary work, reviewed once
/// every primary record carries a review, translated in between.
#[must_use]
pub fn video_status(translations: &[Translation]) -> VideoStatus {
    let mut any_primary = false;
    let mut all_reviewed = true;

    for t in translations.iter().filter(|t| !t.reviewer) {
        any_primary = true;
        all_reviewed &= t.reviewed;
    }

    if !any_primary {
        VideoStatus::Untranslated
    } else if all_reviewed {
        VideoStatus::Reviewed
    } else {
        VideoStatus::Translated
    }
}

/// Distinct users who authored a primary translation, in first-contribution
/// order. Callers truncate for display.
#[must_use]
pub fn translators(translations: &[Translation]) -> Vec<i32> {
    distinct_user_ids(translations.iter().filter(|t| !t.reviewer))
}

/// Distinct users who authored a review pass, minus anyone already counted
/// as a translator: the displayed lists are always disjoint, even for a user
/// holding both kinds of record.
#[must_use]
pub fn reviewers(translations: &[Translation]) -> Vec<i32> {
    let translator_ids = translators(translations);
    distinct_user_ids(translations.iter().filter(|t| t.reviewer))
        .into_iter()
        .filter(|id| !translator_ids.contains(id))
        .collect()
}

fn distinct_user_ids<'a, I>(records: I) -> Vec<i32>
where
    I: Iterator<Item = &'a Translation>,
{
    let mut seen = Vec::new();
    for record in records {
        if !seen.contains(&record.user_id) {
            seen.push(record.user_id);
        }
    }
    seen
}

/// Splits videos into (translated, untranslated) by the derived predicate.
/// Pure filter; relative order is preserved on both sides.
#[must_use]
pub fn partition_by_translated(
    videos: Vec<(Video, Vec<Translation>)>,
) -> (Vec<Video>, Vec<Video>) {
    let mut translated = Vec::new();
    let mut untranslated = Vec::new();

    for (video, translations) in videos {
        if is_translated(&translations) {
            translated.push(video);
        } else {
            untranslated.push(video);
        }
    }

    (translated, untranslated)
}
