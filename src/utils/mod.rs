pub mod list_view;

pub use list_view::{Applied, FetchTicket, ListController, ListView, Mutation, PageSource};
