use std::collections::HashMap;

use lazy_static::lazy_static;
use log::error;
use tera::{Context, Tera, Value};

use crate::views;

macro_rules! template {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name)))
    };
}

lazy_static! {
    static ref TEMPLATES: Result<Tera, String> = {
        let mut tera = Tera::default();
        tera.register_filter("segment", segment);
        tera.add_raw_templates(vec![
            template!("base.html"),
            template!("index.html"),
            template!("place.html"),
            template!("add_place.html"),
            template!("add_review.html"),
            template!("login.html"),
            template!("register.html"),
            template!("admin.html"),
            template!("confirm.html"),
            template!("error.html"),
        ])
        .map(|()| tera)
        .map_err(|err| {
            error!("Parsing error(s): {:?}", err);
            err.to_string()
        })
    };
}

/// `{{ id | segment }}`: an id made safe to splice into a page path.
fn segment(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(id) => Ok(Value::String(views::segment(id))),
        None => Err(tera::Error::msg(format!(
            "`segment` expects a string, got {}",
            value
        ))),
    }
}

/// Render one of the built-in templates.
pub fn render(name: &str, context: &Context) -> Result<String, tera::Error> {
    match &*TEMPLATES {
        Ok(templates) => templates.render(name, context),
        Err(err) => Err(tera::Error::msg(format!("templates failed to parse: {}", err))),
    }
}
