//! Data exchanged with the server: folder payloads it sends us, and requests we send it

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::error::Error;

use minidom::Element;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::organizer::{OrganizerId, ViewType};
use crate::organizer::color::Color;
use crate::utils::find_elems;


/// An organizer as described by the server, possibly with its whole subtree.
///
/// Notifications of modifications only carry the fields that changed, that's why everything is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrganizerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_color", skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// The URL of the remote feed this organizer is a subscription to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "excludeFreeBusy", default, skip_serializing_if = "Option::is_none")]
    pub exclude_free_busy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(rename = "l", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<OrganizerId>,

    /// Owned sub-organizers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folder: Vec<FolderPayload>,
    /// Links to organizers shared by other users
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<FolderPayload>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<Acl>,
}

impl FolderPayload {
    /// A payload that carries only an ID, to be completed with struct update syntax
    pub fn with_id(id: &str) -> Self {
        Self { id: Some(OrganizerId::from(id)), ..Self::default() }
    }

    pub fn is_view(&self, view: ViewType) -> bool {
        view.matches_tag(self.view.as_deref())
    }
}

/// Unknown color numbers are ignored (with a warning) instead of failing the whole payload
fn deserialize_color<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<i64>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(n) => n,
    };
    match u8::try_from(number).map_err(|err| err.to_string()).and_then(Color::try_from) {
        Ok(color) => Ok(Some(color)),
        Err(err) => {
            log::warn!("Invalid color {} ({}). Ignoring it", number, err);
            Ok(None)
        },
    }
}

/// The access control list of an organizer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Acl {
    #[serde(default)]
    pub grant: Vec<Grant>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Grantee type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    /// Grantee ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zid: Option<String>,
    /// Grantee display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// Permission letters, e.g. `rwid`
    #[serde(default)]
    pub perm: String,
}


impl TryFrom<&Element> for FolderPayload {
    type Error = Box<dyn Error>;

    /// Create an instance from an XML `<folder>` or `<link>` element
    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        if element.name() != "folder" && element.name() != "link" {
            return Err(format!("Element must be a <folder> or a <link>, not a <{}>", element.name()).into());
        }

        let color = match element.attr("color") {
            None => None,
            Some(text) => match text.parse::<u8>().map_err(|err| err.to_string()).and_then(Color::try_from) {
                Ok(color) => Some(color),
                Err(err) => {
                    log::warn!("Invalid color {:?} ({}). Ignoring it", text, err);
                    None
                },
            },
        };

        let url = match element.attr("url") {
            None => None,
            Some(text) => match Url::parse(text) {
                Ok(url) => Some(url),
                Err(err) => {
                    log::warn!("Invalid feed URL {:?} ({}). Ignoring it", text, err);
                    None
                },
            },
        };

        let mut payload = FolderPayload {
            id: element.attr("id").map(OrganizerId::from),
            name: element.attr("name").map(String::from),
            color,
            url,
            owner: element.attr("d").map(String::from),
            exclude_free_busy: element.attr("excludeFreeBusy").map(|v| v == "1" || v == "true"),
            view: element.attr("view").map(String::from),
            parent_id: element.attr("l").map(OrganizerId::from),
            ..FolderPayload::default()
        };

        for child in element.children() {
            match child.name() {
                "folder" => payload.folder.push(FolderPayload::try_from(child)?),
                "link" => payload.link.push(FolderPayload::try_from(child)?),
                "acl" => {
                    let grant = find_elems(child, "grant")
                        .into_iter()
                        .map(|g| Grant {
                            gt: g.attr("gt").map(String::from),
                            zid: g.attr("zid").map(String::from),
                            d: g.attr("d").map(String::from),
                            perm: g.attr("perm").unwrap_or_default().to_string(),
                        })
                        .collect();
                    payload.acl = Some(Acl { grant });
                },
                _ => continue,
            }
        }

        Ok(payload)
    }
}


/// An action on an existing organizer, e.g. `fb` to change its free/busy setting
#[derive(Clone, Debug, PartialEq)]
pub struct OrganizerAction {
    action: String,
    attrs: BTreeMap<String, String>,
}

impl OrganizerAction {
    pub fn new(action: &str) -> Self {
        Self { action: action.to_string(), attrs: BTreeMap::new() }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn action(&self) -> &str                       { &self.action }
    pub fn attrs(&self) -> &BTreeMap<String, String>   { &self.attrs  }
}


/// A request to create a new organizer
#[derive(Clone, Debug, PartialEq)]
pub struct CreateFolderRequest {
    name: String,
    parent_id: OrganizerId,
    view: ViewType,
    url: Option<Url>,
}

impl CreateFolderRequest {
    pub fn new(name: String, parent_id: OrganizerId, view: ViewType, url: Option<Url>) -> Self {
        Self { name, parent_id, view, url }
    }

    pub fn name(&self) -> &str                 { &self.name          }
    pub fn parent_id(&self) -> &OrganizerId    { &self.parent_id     }
    pub fn view(&self) -> ViewType             { self.view           }
    pub fn url(&self) -> Option<&Url>          { self.url.as_ref()   }
}
