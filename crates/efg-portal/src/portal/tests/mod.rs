mod common;
mod page;
mod view;
