pub mod client;
pub mod owner;

pub use client::{AdminClient, ListPage, Page, ResourceApi};
pub use owner::RemoteOwner;
