//! HTML templates, compiled into the binary.

use minijinja::Environment;

pub const INDEX_TEMPLATE: &str = "index.html";
pub const CHAT_TEMPLATE: &str = "chat.html";

/// Build the template environment. `.html` names are auto-escaped.
pub fn build_templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
    env.add_template(CHAT_TEMPLATE, include_str!("../../templates/chat.html"))?;
    Ok(env)
}
