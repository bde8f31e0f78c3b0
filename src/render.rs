//! Template rendering
//!
//! Page templates are compiled into the binary and may be replaced at startup by
//! files of the same name under the configured templates directory.

use crate::controller::connect::{CONNECTED_TEMPLATE, CONNECT_TEMPLATE};
use crate::controller::hello::HELLO_TEMPLATE;
use crate::error::Result;
use crate::view::RenderInstruction;
use handlebars::Handlebars;
use std::path::Path;

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (HELLO_TEMPLATE, include_str!("../templates/hello.hbs")),
    (
        CONNECT_TEMPLATE,
        include_str!("../templates/connect/twitter_connect.hbs"),
    ),
    (
        CONNECTED_TEMPLATE,
        include_str!("../templates/connect/twitter_connected.hbs"),
    ),
];

pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Build the registry, preferring `<dir>/<name>.hbs` over the built-in template
    pub fn new(override_dir: Option<&str>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        for (name, builtin) in BUILTIN_TEMPLATES {
            let source = match override_dir.map(|dir| Path::new(dir).join(format!("{name}.hbs"))) {
                Some(path) if path.is_file() => {
                    crate::logger::log_info(&format!(
                        "[Templates] Using {} for '{name}'",
                        path.display()
                    ));
                    std::fs::read_to_string(&path)?
                }
                _ => (*builtin).to_string(),
            };
            registry
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    pub fn render(&self, instruction: &RenderInstruction) -> Result<String> {
        Ok(self
            .registry
            .render(instruction.template, &instruction.model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::{CursoredList, Profile};
    use crate::view::ViewModel;

    fn hello_instruction(name: &str, friends: Vec<Profile>) -> RenderInstruction {
        let mut model = ViewModel::new();
        model.insert("profile", &Profile::named(name)).unwrap();
        model
            .insert("friends", &CursoredList::new(friends, None))
            .unwrap();
        RenderInstruction {
            template: HELLO_TEMPLATE,
            model,
        }
    }

    #[test]
    fn test_render_hello_page() {
        let renderer = Renderer::new(None).unwrap();
        let html = renderer
            .render(&hello_instruction("Ada", vec![Profile::named("Bob")]))
            .unwrap();

        assert!(html.contains("Hello, <span>Ada</span>!"));
        assert!(html.contains("<li>Bob</li>"));
    }

    #[test]
    fn test_render_escapes_html() {
        let renderer = Renderer::new(None).unwrap();
        let html = renderer
            .render(&hello_instruction("<script>", Vec::new()))
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let renderer = Renderer::new(None).unwrap();
        let instruction = RenderInstruction {
            template: HELLO_TEMPLATE,
            model: ViewModel::new(),
        };
        assert!(renderer.render(&instruction).is_err());
    }

    #[test]
    fn test_override_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("hello.hbs"), "Hi {{profile.name}}").unwrap();

        let renderer = Renderer::new(dir.path().to_str()).unwrap();
        let html = renderer
            .render(&hello_instruction("Ada", Vec::new()))
            .unwrap();
        assert_eq!(html, "Hi Ada");

        // Templates without an override keep the built-in source
        let mut model = ViewModel::new();
        model.insert("provider_id", &"twitter").unwrap();
        model.insert("user_id", &"testuser").unwrap();
        let html = renderer
            .render(&RenderInstruction {
                template: CONNECT_TEMPLATE,
                model,
            })
            .unwrap();
        assert!(html.contains("Connect to Twitter"));
    }

    #[test]
    fn test_invalid_override_fails_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("hello.hbs"), "{{#each}}").unwrap();

        assert!(Renderer::new(dir.path().to_str()).is_err());
    }
}
