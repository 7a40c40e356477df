//! Handlebars page templates, compiled into the binary.
//!
//! Values are HTML-escaped on render, so ad text from the service is safe to
//! interpolate.

use handlebars::{Handlebars, TemplateError};

pub const INDEX: &str = "index";
pub const RESULTS: &str = "results";

pub fn build_templates() -> Result<Handlebars<'static>, TemplateError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_partial("head", include_str!("../templates/partials/head.hbs"))?;
    handlebars.register_partial("foot", include_str!("../templates/partials/foot.hbs"))?;
    handlebars.register_template_string(INDEX, include_str!("../templates/index.hbs"))?;
    handlebars.register_template_string(RESULTS, include_str!("../templates/results.hbs"))?;
    Ok(handlebars)
}
