//! HTML form parsing for credential submission.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static FORM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("form").expect("Invalid form selector"));

static CONTROL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("input[name], textarea[name], button[name]")
        .expect("Invalid form control selector")
});

/// HTTP method a form submits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// A parsed `<form>` with the values a browser would submit by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    /// Raw `action` attribute; empty means "the current page".
    pub action: String,
    pub method: FormMethod,
    /// Successful controls in document order.
    pub fields: Vec<(String, String)>,
}

impl HtmlForm {
    /// Parse the `index`-th form (zero based) of a document.
    pub fn parse(body: &str, index: usize) -> Option<Self> {
        let document = Html::parse_document(body);
        let form = document.select(&FORM_SELECTOR).nth(index)?;

        let action = form.value().attr("action").unwrap_or("").to_string();
        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("get") => FormMethod::Get,
            Some(_) => FormMethod::Post,
            None => FormMethod::Get,
        };

        let mut fields = Vec::new();
        let mut submit_taken = false;
        for control in form.select(&CONTROL_SELECTOR) {
            if let Some(field) = control_value(control, &mut submit_taken) {
                fields.push(field);
            }
        }

        Some(Self {
            action,
            method,
            fields,
        })
    }

    /// Default values with `overrides` applied in place, new names appended.
    pub fn fill(&self, overrides: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut fields = self.fields.clone();
        for (name, value) in overrides {
            match fields.iter_mut().find(|(n, _)| n == name) {
                Some(existing) => existing.1 = value.to_string(),
                None => fields.push((name.to_string(), value.to_string())),
            }
        }
        fields
    }
}

/// Value a control contributes, mirroring a browser clicking the first submit button.
fn control_value(control: ElementRef<'_>, submit_taken: &mut bool) -> Option<(String, String)> {
    let element = control.value();
    let name = element.attr("name")?.to_string();
    if element.attr("disabled").is_some() {
        return None;
    }

    match element.name() {
        "textarea" => Some((name, control.text().collect())),
        "button" => {
            let kind = element.attr("type").unwrap_or("submit");
            if !kind.eq_ignore_ascii_case("submit") || *submit_taken {
                return None;
            }
            *submit_taken = true;
            Some((name, element.attr("value").unwrap_or("").to_string()))
        }
        _ => {
            let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
            let value = element.attr("value");
            match kind.as_str() {
                "button" | "reset" | "file" | "image" => None,
                "submit" => {
                    if *submit_taken {
                        return None;
                    }
                    *submit_taken = true;
                    Some((name, value.unwrap_or("").to_string()))
                }
                "checkbox" | "radio" => element
                    .attr("checked")
                    .map(|_| (name, value.unwrap_or("on").to_string())),
                _ => Some((name, value.unwrap_or("").to_string())),
            }
        }
    }
}
