//! HTTP request handlers.

pub(crate) mod api;
pub(crate) mod pagelets;
pub(crate) mod pages;
