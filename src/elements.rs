//! Types used to represent particular elements on a page.

use crate::session::Command;
use crate::{error, Client};
use serde_json::Value as Json;
use webdriver::common::ELEMENT_KEY;

/// A reference to a single DOM element on the current page.
///
/// This is only the opaque id the WebDriver handed out. It goes stale as soon as the page
/// changes under it, so the page layer looks elements up again for every operation instead of
/// holding on to them.
///
/// Note that there is a lot of subtlety in how you can interact with an element through WebDriver,
/// which [the WebDriver standard goes into detail on](https://www.w3.org/TR/webdriver1/#elements).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element {
    id: String,
}

impl Element {
    /// Read an element reference out of a `Find Element` reply.
    pub(crate) fn from_lookup(res: Json) -> Result<Self, error::CmdError> {
        match res {
            Json::Object(mut o) => match o.remove(ELEMENT_KEY) {
                Some(Json::String(id)) => Ok(Element { id }),
                Some(v) => {
                    o.insert(ELEMENT_KEY.to_string(), v);
                    Err(error::CmdError::NotW3C(Json::Object(o)))
                }
                None => Err(error::CmdError::NotW3C(Json::Object(o))),
            },
            v => Err(error::CmdError::NotW3C(v)),
        }
    }

    /// The WebDriver's id for this element.
    pub fn id(&self) -> &str {
        &self.id
    }
}

fn expect_bool(v: Json) -> Result<bool, error::CmdError> {
    match v {
        Json::Bool(b) => Ok(b),
        v => Err(error::CmdError::NotW3C(v)),
    }
}

fn expect_unit(r: Json) -> Result<(), error::CmdError> {
    // geckodriver returns {} :(
    if r.is_null() || r.as_object().map(|o| o.is_empty()).unwrap_or(false) {
        Ok(())
    } else {
        Err(error::CmdError::NotW3C(r))
    }
}

/// [Element State](https://www.w3.org/TR/webdriver1/#element-state)
impl Client {
    /// Whether `element` is rendered and visible to the user.
    ///
    /// See [Element Displayedness](https://www.w3.org/TR/webdriver1/#element-displayedness).
    pub async fn is_displayed(&self, element: &Element) -> Result<bool, error::CmdError> {
        expect_bool(self.issue(Command::IsDisplayed(element.id())).await?)
    }

    /// Whether `element` is an enabled form control.
    ///
    /// See [13.8 Is Element Enabled](https://www.w3.org/TR/webdriver1/#is-element-enabled).
    pub async fn is_enabled(&self, element: &Element) -> Result<bool, error::CmdError> {
        expect_bool(self.issue(Command::IsEnabled(element.id())).await?)
    }

    /// Look up a DOM [property] of `element` by name.
    ///
    /// `Ok(None)` is returned if the element does not have the given property. Numbers and
    /// booleans are returned in their JSON spelling.
    ///
    /// See [13.3 Get Element Property](https://www.w3.org/TR/webdriver1/#get-element-property).
    ///
    /// [property]: https://www.ecma-international.org/ecma-262/5.1/#sec-8.12.1
    pub async fn property(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, error::CmdError> {
        match self.issue(Command::GetProperty(element.id(), name)).await? {
            Json::String(v) => Ok(Some(v)),
            Json::Null => Ok(None),
            v @ (Json::Bool(_) | Json::Number(_)) => Ok(Some(v.to_string())),
            v => Err(error::CmdError::NotW3C(v)),
        }
    }

    /// Retrieve the rendered text of `element`.
    ///
    /// See [13.5 Get Element Text](https://www.w3.org/TR/webdriver1/#get-element-text).
    pub async fn text(&self, element: &Element) -> Result<String, error::CmdError> {
        match self.issue(Command::GetText(element.id())).await? {
            Json::String(v) => Ok(v),
            v => Err(error::CmdError::NotW3C(v)),
        }
    }
}

/// [Element Interaction](https://www.w3.org/TR/webdriver1/#element-interaction)
impl Client {
    /// Simulate the user clicking on `element`.
    ///
    /// This may navigate, after which `element` is stale.
    ///
    /// See [14.1 Element Click](https://www.w3.org/TR/webdriver1/#element-click).
    pub async fn click(&self, element: &Element) -> Result<(), error::CmdError> {
        expect_unit(self.issue(Command::Click(element.id())).await?)
    }

    /// Clear `element`.
    ///
    /// See [14.2 Element Clear](https://www.w3.org/TR/webdriver1/#element-clear).
    pub async fn clear(&self, element: &Element) -> Result<(), error::CmdError> {
        expect_unit(self.issue(Command::Clear(element.id())).await?)
    }

    /// Simulate the user typing `text` into `element`.
    ///
    /// The element is scrolled into view first. If it is not keyboard-interactable,
    /// [`CmdError::NotInteractable`](error::CmdError::NotInteractable) is returned.
    ///
    /// See [14.3 Element Send Keys](https://www.w3.org/TR/webdriver1/#element-send-keys).
    pub async fn send_keys(&self, element: &Element, text: &str) -> Result<(), error::CmdError> {
        expect_unit(self.issue(Command::SendKeys(element.id(), text)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_reads_the_element_key() {
        let e = Element::from_lookup(json!({ ELEMENT_KEY: "e-42" })).unwrap();
        assert_eq!(e.id(), "e-42");
    }

    #[test]
    fn lookup_without_key_is_not_w3c() {
        let err = Element::from_lookup(json!({ "ELEMENT": "e-42" })).unwrap_err();
        assert!(matches!(err, error::CmdError::NotW3C(..)));
    }

    #[test]
    fn empty_object_counts_as_unit() {
        assert!(expect_unit(json!({})).is_ok());
        assert!(expect_unit(Json::Null).is_ok());
        assert!(expect_unit(json!("x")).is_err());
    }
}
