//! # Repository Module
//!
//! Database repository implementations for Till.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller (API handler, seed tool, test)                                 │
//! │       │                                                                 │
//! │       │  db.till().settle_order("ORD-1001", total, &payment, &legal)   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  TillRepository                                                        │
//! │  ├── snapshot(&self)                                                   │
//! │  ├── ensure_denominations(&self, legal)                                │
//! │  ├── deposit(&self, value, count)                                      │
//! │  └── settle_order(&self, order_ref, total, payment, legal)             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (mock the repository)                                  │
//! │  • SQL is isolated in one place                                        │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TillRepository`] - Denomination stock and settlement commits
//! - [`SettlementRepository`] - Settlement history queries
//!
//! [`TillRepository`]: till::TillRepository
//! [`SettlementRepository`]: settlement::SettlementRepository

pub mod settlement;
pub mod till;
