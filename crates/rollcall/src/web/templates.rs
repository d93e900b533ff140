//! HTML template registry for rollcall.
//!
//! Templates are minijinja based and kept as stand-alone files, separating
//! them from code so they are easier to edit and diff. They are embedded as
//! string constants with `include_str!` and registered in one shared
//! environment at first use.
//!
//! Template names end in `.html`, which turns on minijinja's HTML
//! auto-escaping, so user-submitted values are safe to interpolate.

use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::Result;

/// Shared page skeleton: navigation, flash banner, content block.
pub const BASE_TEMPLATE: &str = include_str!("templates/base.html");
/// Student list with search form.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
/// Static informational page.
pub const ABOUT_TEMPLATE: &str = include_str!("templates/about.html");
/// Contact form page.
pub const CONTACT_TEMPLATE: &str = include_str!("templates/contact.html");
/// Add-student form.
pub const ADD_STUDENT_TEMPLATE: &str = include_str!("templates/add_student.html");
/// Edit-student form.
pub const EDIT_STUDENT_TEMPLATE: &str = include_str!("templates/edit_student.html");

/// All templates by registered name.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", BASE_TEMPLATE),
    ("index.html", INDEX_TEMPLATE),
    ("about.html", ABOUT_TEMPLATE),
    ("contact.html", CONTACT_TEMPLATE),
    ("add_student.html", ADD_STUDENT_TEMPLATE),
    ("edit_student.html", EDIT_STUDENT_TEMPLATE),
];

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        // Template sources are compile-time constants; a syntax error here
        // is a build defect, not a runtime condition.
        env.add_template(name, source)
            .expect("embedded template is valid");
    }
    env
});

/// Render a registered template with the given context.
///
/// # Errors
///
/// Returns [`crate::error::Error::Template`] if the template is unknown or
/// rendering fails.
pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<String> {
    let template = ENV.get_template(name)?;
    Ok(template.render(ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    use crate::student::{Student, StudentForm};

    #[test]
    fn test_all_templates_registered() {
        for (name, _) in TEMPLATES {
            assert!(ENV.get_template(name).is_ok(), "missing template {name}");
        }
    }

    #[test]
    fn test_index_renders_empty_list() {
        let html = render(
            "index.html",
            context! {
                active => "home",
                q => "",
                students => Vec::<crate::student::StudentView>::new(),
                flash => (),
            },
        )
        .unwrap();

        assert!(html.contains("No students found"));
        assert!(html.contains("<form method=\"get\""));
    }

    #[test]
    fn test_index_renders_students_and_search_term() {
        let student = Student {
            id: Some(1),
            name: "Ann Lee".to_string(),
            roll: "R100".to_string(),
            course: Some("CS".to_string()),
            email: None,
        };

        let html = render(
            "index.html",
            context! {
                active => "home",
                q => "ann",
                students => vec![student.view()],
                flash => (),
            },
        )
        .unwrap();

        assert!(html.contains("Ann Lee"));
        assert!(html.contains("R100"));
        // Active search term carried back into the input field
        assert!(html.contains("value=\"ann\""));
        assert!(html.contains("/students/1/edit"));
        assert!(html.contains("/students/1/delete"));
    }

    #[test]
    fn test_index_escapes_user_content() {
        let student = Student {
            id: Some(1),
            name: "<script>alert(1)</script>".to_string(),
            roll: "R1".to_string(),
            course: None,
            email: None,
        };

        let html = render(
            "index.html",
            context! {
                active => "home",
                q => "",
                students => vec![student.view()],
                flash => (),
            },
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_add_form_preserves_submitted_values() {
        let form = StudentForm {
            name: "Ann".to_string(),
            roll: String::new(),
            course: "CS".to_string(),
            email: String::new(),
        };

        let html = render(
            "add_student.html",
            context! {
                active => "add",
                form => form,
                error => "roll is required",
            },
        )
        .unwrap();

        assert!(html.contains("value=\"Ann\""));
        assert!(html.contains("value=\"CS\""));
        assert!(html.contains("roll is required"));
    }

    #[test]
    fn test_edit_form_posts_to_student_url() {
        let form = StudentForm {
            name: "Ann".to_string(),
            roll: "R1".to_string(),
            course: String::new(),
            email: String::new(),
        };

        let html = render(
            "edit_student.html",
            context! {
                active => "home",
                id => 7,
                form => form,
                error => (),
            },
        )
        .unwrap();

        assert!(html.contains("action=\"/students/7/edit\""));
        assert!(html.contains("value=\"R1\""));
    }

    #[test]
    fn test_about_and_contact_render() {
        let about = render("about.html", context! { active => "about" }).unwrap();
        assert!(about.contains("About"));

        let contact = render(
            "contact.html",
            context! {
                active => "contact",
                form => crate::web::ContactForm::default(),
                error => (),
                flash => (),
            },
        )
        .unwrap();
        assert!(contact.contains("action=\"/contact\""));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let result = render("missing.html", context! {});
        assert!(result.is_err());
    }
}
