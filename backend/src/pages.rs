use minijinja::{Environment, context};

/// Server-rendered pages. Templates are compiled into the binary and the
/// environment is built once at startup.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("display.html", include_str!("../templates/display.html"))?;
        Ok(Self { env })
    }

    /// The upload form, with no status banner.
    pub fn index(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {})
    }

    /// The upload form re-rendered with an error banner.
    pub fn index_with_error(&self, status: u16, message: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("index.html")?
            .render(context! { status => status, res => message })
    }

    /// The result page. `result` is pre-authored markup and is rendered
    /// unescaped by the template.
    pub fn display(&self, status: u16, result: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("display.html")?
            .render(context! { status => status, result => result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_renders_without_banner() {
        let pages = Pages::new().unwrap();
        let html = pages.index().unwrap();
        assert!(html.contains("multipart/form-data"));
        assert!(!html.contains("class=\"banner\""));
    }

    #[test]
    fn index_error_banner_is_escaped() {
        let pages = Pages::new().unwrap();
        let html = pages.index_with_error(400, "<script>alert(1)</script>").unwrap();
        assert!(html.contains("400"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn display_keeps_advice_markup_unescaped() {
        let pages = Pages::new().unwrap();
        let html = pages.display(200, "<b>Aphids</b>").unwrap();
        assert!(html.contains("<b>Aphids</b>"));
    }
}
