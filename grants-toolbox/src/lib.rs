//! Core of the grant-election voting flow: merging and ordering election
//! lists for display, grouping them into grant rounds, and accumulating a
//! per-term vote allocation until a single submission.
//!
//! Normalization of raw election records lives in `election-lib`; wallet,
//! rendering and on-chain submission are external collaborators reached
//! only through plain data and the traits in [`session`].

pub mod elections;
pub mod ledger;
pub mod rounds;
pub mod session;
