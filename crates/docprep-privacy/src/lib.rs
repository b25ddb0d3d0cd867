//! Privacy entity detection, merging, and masking.
//!
//! Three detector strategies run over the same text:
//!
//! 1. [`RegexPiiDetector`] finds emails and phone numbers by pattern
//! 2. [`NerStrategy`] wraps a named-entity model for people, places, and dates
//! 3. [`OpenVocabStrategy`] wraps an open-vocabulary model for workplace
//!    labels (job titles, departments, salaries, employee numbers)
//!
//! Their candidate spans are merged by [`merge::merge_detections`] and the
//! winners are replaced in the text with `[TYPE]` tags. Model-backed
//! strategies are injected behind traits; the crate ships a small
//! honorific-pattern model so person masking works without any external
//! model.

pub mod filter;
pub mod merge;
pub mod ner;
pub mod openvocab;
pub mod regex_pii;

pub use filter::{Detector, FilterResult, FoundItem, PrivacyFilter};
pub use merge::merge_detections;
pub use ner::{HonorificNerModel, NerEntity, NerModel, NerStrategy};
pub use openvocab::{LabeledSpan, OpenVocabModel, OpenVocabStrategy};
pub use regex_pii::RegexPiiDetector;
