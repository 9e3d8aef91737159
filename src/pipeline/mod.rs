//! Pipeline stages for résumé-to-record extraction.
//!
//! Each submodule implements exactly one step. Every step takes values and
//! returns new ones, so stages are independently testable and no stage can
//! see another's intermediate state.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ text ──▶ sections ──┬─▶ contact ────┐
//! (URL/path) (lines)  (buckets)  ├─▶ skills ─────┤
//!                                ├─▶ experience ─┼─▶ postprocess ──▶ assemble
//!                                ├─▶ education ──┤   (repair)        (record)
//!                                └─▶ projects ───┘
//! ```
//!
//! 1. [`input`]: canonicalise the user-supplied path or URL to a local file
//! 2. [`text`]: decode the file to plain text and number its lines
//! 3. [`sections`]: partition lines into labelled buckets by header lines
//! 4. [`contact`], [`skills`], [`experience`], [`education`], [`projects`]
//!    are the field extractors; contact and skills also read the whole text
//! 5. [`postprocess`]: deterministic repair rules for extractor output
//! 6. [`dates`]: duration parsing and total years of experience
//! 7. [`assemble`]: run 3–6 and build the output record

pub mod assemble;
pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;
pub mod input;
pub mod postprocess;
pub mod projects;
pub mod sections;
pub mod skills;
pub mod text;
