pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod state;

pub mod crypto {
    pub mod oauth_state;
}

pub mod models {
    pub mod admin;
    pub mod catalog;
    pub mod identity;
    pub mod order;
    pub mod outcome;
    pub mod pagination;
    pub mod repair;
    pub mod session;
    pub mod shipping;
    pub mod user;
}

pub mod repositories {
    pub mod admin;
    pub mod session;
    pub mod user;
}

pub mod services {
    pub mod accounts;
    pub mod api_client;
    pub mod auth;
    pub mod oauth;
    pub mod orders;
    pub mod products;
    pub mod repairs;
    pub mod resource;
    pub mod shipping;
    pub mod taxonomy;
    pub mod token;
}

pub mod handlers {
    pub mod accounts;
    pub mod auth;
    pub mod catalog;
    pub mod orders;
    pub mod repairs;
    pub mod shipping;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
    pub mod forms;
}
