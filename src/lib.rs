//! Admin panel for a bookings API: session handling, the booking list and
//! the create/edit/delete workflows, independent of any toolkit. The GTK
//! front end lives in [`ui`] behind the `gui` feature.

pub mod api;
pub mod app;
pub mod dashboard;
pub mod notify;
pub mod public;
pub mod session;
pub mod storage;
pub mod utils;
pub mod view;

#[cfg(feature = "gui")]
pub mod ui;

#[cfg(test)]
mod testutils;
