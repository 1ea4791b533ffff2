/// One SVG element with its attributes in insertion order.
pub(crate) struct SvgTag {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
}

impl SvgTag {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, key: &'static str, value: impl ToString) -> Self {
        self.attributes.push((key, value.to_string()));
        self
    }

    /// Numeric attribute, rounded to two decimals.
    pub(crate) fn num(self, key: &'static str, value: f64) -> Self {
        self.attr(key, format!("{:.2}", value))
    }

    pub(crate) fn render(&self, self_closing: bool) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_xml(v)))
            .collect::<Vec<_>>()
            .join(" ");

        if self_closing {
            format!("<{} {}/>", self.name, attrs)
        } else {
            format!("<{} {}>", self.name, attrs)
        }
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// An SVG document built element by element.
pub(crate) struct SvgDocument {
    body: String,
    width: f64,
    height: f64,
}

impl SvgDocument {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            body: String::new(),
            width,
            height,
        }
    }

    pub(crate) fn push(&mut self, tag: SvgTag) {
        self.body.push_str(&tag.render(true));
        self.body.push('\n');
    }

    pub(crate) fn push_text(&mut self, tag: SvgTag, text: &str) {
        self.body.push_str(&tag.render(false));
        self.body.push_str(&escape_xml(text));
        self.body.push_str("</text>\n");
    }

    pub(crate) fn finish(self) -> String {
        let mut svg = String::new();
        svg.push_str(
            &SvgTag::new("svg")
                .attr("xmlns", "http://www.w3.org/2000/svg")
                .num("width", self.width)
                .num("height", self.height)
                .attr(
                    "viewBox",
                    format!("0 0 {:.2} {:.2}", self.width, self.height),
                )
                .attr("style", "background:#ffffff")
                .render(false),
        );
        svg.push('\n');
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}
