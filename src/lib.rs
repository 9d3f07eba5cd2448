pub mod app;
pub mod config;
pub mod error;
pub mod models {
    pub mod document;
    pub mod search;
}
pub mod search {
    pub mod index;
    pub mod source;
}
pub mod static_files {
    pub mod resolver;
    pub mod server;
}
pub mod feedback {
    pub mod store;
}
pub mod api {
    pub mod assets;
    pub mod errors;
    pub mod feedback;
    pub mod health;
    pub mod search;
}
