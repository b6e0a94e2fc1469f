use scraper::{ElementRef, Html, Node};

const KEPT_ATTRIBUTES: [&str; 1] = ["href"];
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "col", "wbr", "input"];

/// Re-serializes a description cell for publication: every attribute except
/// `href` is dropped, relative links are resolved against `base_url`, and
/// links open in a new tab. Only top-level elements are kept; loose text
/// between them is dropped.
pub fn clean_description_html(inner_html: &str, base_url: &str) -> String {
    let fragment = Html::parse_fragment(inner_html);
    let mut out = String::with_capacity(inner_html.len());

    for element in fragment.root_element().child_elements() {
        write_element(element, base_url, &mut out);
    }

    out
}

fn write_element(element: ElementRef<'_>, base_url: &str, out: &mut String) {
    let name = element.value().name();
    out.push('<');
    out.push_str(name);

    for attribute in KEPT_ATTRIBUTES {
        if let Some(value) = element.value().attr(attribute) {
            let value = if attribute == "href" {
                resolve_href(value, base_url)
            } else {
                value.to_string()
            };
            out.push_str(&format!(
                " {attribute}=\"{}\"",
                html_escape::encode_double_quoted_attribute(&value)
            ));
        }
    }
    if name == "a" && element.value().attr("href").is_some() {
        out.push_str(" target=\"_blank\"");
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, base_url, out);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn resolve_href(href: &str, base_url: &str) -> String {
    if href.contains("://") || href.starts_with("mailto:") {
        href.to_string()
    } else {
        format!("{base_url}{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "http://dicom.nema.org/medical/dicom/current/output/html/";

    #[test]
    fn strips_attributes_and_resolves_links() {
        let html = r#"
<p class="para"><a id="para_1" shape="rect"></a>See <a class="xref" href="part03.html#sect_10.6.1" shape="rect">Section 10.6.1</a>.</p>
"#;

        let cleaned = clean_description_html(html, BASE_URL);

        assert_eq!(
            cleaned,
            "<p><a></a>See <a href=\"http://dicom.nema.org/medical/dicom/current/output/html/part03.html#sect_10.6.1\" target=\"_blank\">Section 10.6.1</a>.</p>"
        );
    }

    #[test]
    fn absolute_links_are_left_alone() {
        let cleaned = clean_description_html(
            r#"<p><a href="https://www.iana.org/">IANA</a></p>"#,
            BASE_URL,
        );

        assert_eq!(
            cleaned,
            "<p><a href=\"https://www.iana.org/\" target=\"_blank\">IANA</a></p>"
        );
    }

    #[test]
    fn top_level_text_is_dropped() {
        assert_eq!(clean_description_html("  loose text  ", BASE_URL), "");
        assert_eq!(
            clean_description_html("before<p>A &lt; B</p>\n after", BASE_URL),
            "<p>A &lt; B</p>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        assert_eq!(
            clean_description_html("<p>one<br class=\"x\">two</p>", BASE_URL),
            "<p>one<br>two</p>"
        );
    }
}
