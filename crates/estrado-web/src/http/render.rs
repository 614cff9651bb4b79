//! HTML rendering with minijinja.
//!
//! Templates are compiled into the binary. Every page receives the view's
//! own variables plus the per-request page data: `flash`, `errors`, `old`,
//! `auth_user` and `storage_url`.

use minijinja::value::ValueKind;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use serde_json::json;

use estrado_core::outcome::View;
use estrado_types::flash::FlashBag;
use estrado_types::session::SessionUser;

const TEMPLATES: &[(&str, &str)] = &[
    ("layouts/app", include_str!("../../templates/layouts/app.html")),
    ("admin/speakers/index", include_str!("../../templates/admin/speakers/index.html")),
    ("admin/speakers/create", include_str!("../../templates/admin/speakers/create.html")),
    ("admin/speakers/edit", include_str!("../../templates/admin/speakers/edit.html")),
    ("admin/speakers/show", include_str!("../../templates/admin/speakers/show.html")),
    ("events/index", include_str!("../../templates/events/index.html")),
    ("events/show", include_str!("../../templates/events/show.html")),
    ("events/_fields", include_str!("../../templates/events/_fields.html")),
    ("events/create", include_str!("../../templates/events/create.html")),
    ("events/edit", include_str!("../../templates/events/edit.html")),
    ("events/register", include_str!("../../templates/events/register.html")),
    (
        "events/registration-success",
        include_str!("../../templates/events/registration-success.html"),
    ),
    ("speakers/index", include_str!("../../templates/speakers/index.html")),
    ("speakers/show", include_str!("../../templates/speakers/show.html")),
    ("auth/login", include_str!("../../templates/auth/login.html")),
    ("auth/verify-email", include_str!("../../templates/auth/verify-email.html")),
];

/// Per-request data merged into every page.
#[derive(Debug)]
pub struct PageData<'a> {
    pub flashed: &'a FlashBag,
    pub user: Option<&'a SessionUser>,
    pub storage_url: &'a str,
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        // Upstream payloads are loosely shaped; missing nested keys render empty.
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.add_filter("as_text", as_text);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, view: &View, page: &PageData<'_>) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(view.template)?;

        let mut context = view.context.clone();
        context.insert("flash".into(), json!(page.flashed.flash));
        context.insert("errors".into(), json!(page.flashed.errors));
        context.insert("old".into(), json!(page.flashed.old_input));
        context.insert("auth_user".into(), json!(page.user));
        context.insert(
            "storage_url".into(),
            json!(page.storage_url.trim_end_matches('/')),
        );

        template.render(context)
    }
}

/// Display a loosely-typed upstream value: lists are joined with `, `,
/// missing values become the empty string.
fn as_text(value: Value) -> String {
    match value.kind() {
        ValueKind::Undefined | ValueKind::None => String::new(),
        ValueKind::Seq => match value.try_iter() {
            Ok(items) => items.map(as_text).collect::<Vec<_>>().join(", "),
            Err(_) => String::new(),
        },
        _ => match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        },
    }
}
