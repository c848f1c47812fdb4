// Askama template definitions

use askama::Template;

use super::context::{Shell, Theme};
use crate::db::Class;

// Home page
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: Shell,
    pub themes: [Theme; 3],
}

// Active classes listing
#[derive(Template)]
#[template(path = "classes.html")]
pub struct ClassesTemplate {
    pub shell: Shell,
    pub classes: Vec<Class>,
    pub error: Option<String>,
}
