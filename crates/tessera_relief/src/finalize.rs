//! Pure attribute finalization.
//!
//! Folds an element's class list and style declarations into `class` and
//! `style` attributes without touching the element, so repeated lowering
//! passes over the same tree always observe the same input.

use std::borrow::Cow;

use crate::Element;

/// An attribute as it will appear in markup or in an `Attrs` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalAttr<'a> {
    pub name: Cow<'a, str>,
    pub value: Cow<'a, str>,
    pub mutable: bool,
}

/// Compute the final attribute list of `el`.
///
/// Explicit attributes keep their declaration order. The folded `class` and
/// `style` attributes take the position of an explicit attribute of the same
/// name, or are appended after all explicit attributes.
pub fn attributes(el: &Element) -> Vec<FinalAttr<'_>> {
    let explicit_class = el.attrs.iter().find(|a| a.name == "class");
    let explicit_style = el.attrs.iter().find(|a| a.name == "style");

    let mut class = fold_classes(el, explicit_class.map(|a| (a.value.as_str(), a.mutable)));
    let mut style = fold_styles(el, explicit_style.map(|a| (a.value.as_str(), a.mutable)));

    let mut result = Vec::with_capacity(el.attrs.len() + 2);
    let mut class_seen = false;
    let mut style_seen = false;

    for attr in &el.attrs {
        match attr.name.as_str() {
            "class" => {
                if !class_seen {
                    class_seen = true;
                    result.extend(class.take());
                }
            }
            "style" => {
                if !style_seen {
                    style_seen = true;
                    result.extend(style.take());
                }
            }
            _ => result.push(FinalAttr {
                name: Cow::Borrowed(attr.name.as_str()),
                value: Cow::Borrowed(attr.value.as_str()),
                mutable: attr.mutable,
            }),
        }
    }
    result.extend(class);
    result.extend(style);
    result
}

fn fold_classes<'a>(el: &'a Element, explicit: Option<(&'a str, bool)>) -> Option<FinalAttr<'a>> {
    if el.classes.is_empty() {
        return explicit.map(|(value, mutable)| FinalAttr {
            name: Cow::Borrowed("class"),
            value: Cow::Borrowed(value),
            mutable,
        });
    }

    let mut tokens: Vec<&str> = Vec::new();
    let mut mutable = false;
    if let Some((value, explicit_mutable)) = explicit {
        mutable |= explicit_mutable;
        tokens.extend(value.split_whitespace());
    }
    for class in &el.classes {
        mutable |= class.mutable;
        let name = class.name.trim();
        if !name.is_empty() && !tokens.contains(&name) {
            tokens.push(name);
        }
    }

    Some(FinalAttr {
        name: Cow::Borrowed("class"),
        value: Cow::Owned(tokens.join(" ")),
        mutable,
    })
}

fn fold_styles<'a>(el: &'a Element, explicit: Option<(&'a str, bool)>) -> Option<FinalAttr<'a>> {
    if el.styles.is_empty() {
        return explicit.map(|(value, mutable)| FinalAttr {
            name: Cow::Borrowed("style"),
            value: Cow::Borrowed(value),
            mutable,
        });
    }

    let mut parts: Vec<String> = Vec::with_capacity(el.styles.len() + 1);
    let mut mutable = false;
    if let Some((value, explicit_mutable)) = explicit {
        mutable |= explicit_mutable;
        let value = value.trim();
        if !value.is_empty() {
            if value.ends_with(';') {
                parts.push(value.to_owned());
            } else {
                parts.push(format!("{};", value));
            }
        }
    }
    for decl in &el.styles {
        mutable |= decl.mutable;
        parts.push(format!("{}: {};", decl.property, decl.value));
    }

    Some(FinalAttr {
        name: Cow::Borrowed("style"),
        value: Cow::Owned(parts.join(" ")),
        mutable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(attrs: &[FinalAttr<'_>]) -> String {
        attrs
            .iter()
            .map(|a| format!("{}={}{}", a.name, a.value, if a.mutable { "*" } else { "" }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_plain_attributes_pass_through() {
        let el = Element::new("a").attr("href", "/").mutable_attr("title", "t");
        assert_eq!(render(&attributes(&el)), "href=/ title=t*");
    }

    #[test]
    fn test_classes_fold_into_explicit_position() {
        let el = Element::new("div")
            .attr("id", "x")
            .attr("class", "base card")
            .attr("role", "list")
            .class("card")
            .mutable_class("active");
        assert_eq!(
            render(&attributes(&el)),
            "id=x class=base card active* role=list"
        );
    }

    #[test]
    fn test_styles_append_after_attributes() {
        let el = Element::new("p")
            .style("color", "red")
            .style("margin", "0")
            .attr("id", "p1");
        assert_eq!(render(&attributes(&el)), "id=p1 style=color: red; margin: 0;");
    }

    #[test]
    fn test_finalize_does_not_mutate() {
        let el = Element::new("p").class("a").attr("style", "top: 0").style("left", "1px");
        let before = el.clone();
        let first = render(&attributes(&el));
        let second = render(&attributes(&el));
        assert_eq!(first, second);
        assert_eq!(el, before);
        assert_eq!(first, "style=top: 0; left: 1px; class=a");
    }
}
