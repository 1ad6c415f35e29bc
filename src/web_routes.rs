use rocket_dyn_templates::{context, Template};

/// GET / - The three-button control panel
#[get("/")]
pub fn index() -> Template {
    Template::render(
        "index",
        context! {
            title: "Auto Backup Tool",
        },
    )
}
