//! Small, executor agnostic drills in cooperative concurrency.
//!
//! `gatherwait` collects a handful of asynchronous patterns around random
//! delays and periodic values, together with the time-based primitives they
//! are built on. Nothing in the crate depends on a particular async runtime:
//! delays are driven by a shared background timer, so every future here can
//! be awaited under tokio, smol or `futures::executor` alike.
//!
//! Features include:
//! - [`Gather`] for fanning out random delays and gathering them in sorted
//!   order, over bare futures or over cancellable [`Task`]s
//! - [`Comprehension`] for draining periodic random streams and timing
//!   concurrent drains
//! - [`Delay`](timing::Delay), [`sleep`](timing::sleep) and the
//!   [`DelayExt`](delay_ext::DelayExt) operator for deferring futures
//! - [`Periodic`](periodic::Periodic), a finite stream with a fixed interval
//!   between items
//! - [`GithubOrgClient`], a small organisation client over any [`FetchJson`]
//!   source, with [`access_nested_map`](nested::access_nested_map) and
//!   [`Memo`](memo::Memo) as its building blocks

pub mod client;
pub mod comprehension;
pub mod config;
pub mod delay_ext;
pub mod error;
pub mod gather;
pub mod memo;
pub mod nested;
pub mod periodic;
pub mod task;
pub mod timing;

pub use client::{FetchJson, GithubOrgClient};
pub use comprehension::Comprehension;
pub use config::Config;
pub use error::{Error, Result};
pub use gather::Gather;
pub use task::{Task, TaskHandle};
