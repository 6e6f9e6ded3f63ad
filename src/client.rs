//! This module provides a client that sends organizer requests to the server over SOAP

use std::convert::TryFrom;
use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;
use minidom::Element;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use url::Url;

use crate::notify::NotifyBlock;
use crate::organizer::OrganizerId;
use crate::payload::{CreateFolderRequest, FolderPayload, OrganizerAction};
use crate::traits::OrganizerTransport;
use crate::utils::find_elem;


static SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
static ZIMBRA_NS: &str = "urn:zimbra";
static ZIMBRA_MAIL_NS: &str = "urn:zimbraMail";


/// Request that runs `action` on organizer `id`
pub fn folder_action_request(id: &OrganizerId, action: &OrganizerAction) -> Element {
    let mut action_el = Element::builder("action", ZIMBRA_MAIL_NS)
        .attr("op", action.action())
        .attr("id", id.as_str());
    for (name, value) in action.attrs() {
        action_el = action_el.attr(name.as_str(), value.as_str());
    }

    Element::builder("FolderActionRequest", ZIMBRA_MAIL_NS)
        .append(action_el.build())
        .build()
}

/// Request that creates a new organizer
pub fn create_folder_request(request: &CreateFolderRequest) -> Element {
    let mut folder = Element::builder("folder", ZIMBRA_MAIL_NS)
        .attr("name", request.name())
        .attr("l", request.parent_id().as_str())
        .attr("view", request.view().as_tag());
    if let Some(url) = request.url() {
        folder = folder.attr("url", url.as_str());
    }

    Element::builder("CreateFolderRequest", ZIMBRA_MAIL_NS)
        .append(folder.build())
        .build()
}

fn to_xml(element: &Element) -> Result<String, Box<dyn Error>> {
    let mut buffer = Vec::new();
    element.write_to(&mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}


/// An [`OrganizerTransport`] that talks to a real server
pub struct Client {
    url: Url,
    auth_token: Option<String>,

    /// Notifications the server attached to its responses, until someone takes them
    pending_notifications: Mutex<Vec<NotifyBlock>>,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let url = Url::parse(url.as_ref())?;

        Ok(Self{
            url,
            auth_token: None,
            pending_notifications: Mutex::new(Vec::new()),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Set the token returned by the server on authentication
    pub fn set_auth_token<T: ToString>(&mut self, token: T) {
        self.auth_token = Some(token.to_string());
    }

    /// Returns (and forgets) the notifications received so far, oldest first.
    ///
    /// They are expected to be applied to the tree with [`apply_notifications`](crate::notify::apply_notifications)
    pub fn take_notifications(&self) -> Vec<NotifyBlock> {
        let mut pending = match self.pending_notifications.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *pending)
    }

    fn envelope(&self, body: Element) -> Element {
        let mut envelope = Element::builder("Envelope", SOAP_NS);
        if let Some(token) = &self.auth_token {
            let context = Element::builder("context", ZIMBRA_NS)
                .append(Element::builder("authToken", ZIMBRA_NS).append(token.clone()).build())
                .build();
            envelope = envelope.append(Element::builder("Header", SOAP_NS).append(context).build());
        }
        envelope
            .append(Element::builder("Body", SOAP_NS).append(body).build())
            .build()
    }

    async fn send_request(&self, body: Element) -> Result<Element, Box<dyn Error>> {
        let response = reqwest::Client::new()
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/soap+xml; charset=utf-8")
            .body(to_xml(&self.envelope(body))?)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let root = check_response(status, &text)?;

        if let Some(notify) = find_elem(&root, "notify") {
            match NotifyBlock::try_from(notify) {
                Err(err) => log::warn!("Unable to parse notifications: {}. Ignoring them", err),
                Ok(block) => {
                    let mut pending = match self.pending_notifications.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    pending.push(block);
                },
            }
        }
        Ok(root)
    }
}

/// Parse a SOAP response, turning faults and HTTP errors into errors
fn check_response(status: StatusCode, text: &str) -> Result<Element, Box<dyn Error>> {
    // Faults come with an error status, but they tell more about what went wrong
    let parsed = text.parse::<Element>();
    if let Ok(root) = &parsed {
        if let Some(fault) = find_elem(root, "Fault") {
            let reason = find_elem(fault, "Text")
                .map(|e| e.text())
                .unwrap_or_else(|| "<no reason>".to_string());
            let code = find_elem(fault, "Value").map(|e| e.text());
            return Err(format!("Server returned a fault: {} ({:?})", reason, code).into());
        }
    }

    if status.is_success() == false {
        return Err(format!("Unexpected HTTP status code {:?}", status).into());
    }
    Ok(parsed?)
}

#[async_trait]
impl OrganizerTransport for Client {
    async fn organizer_action(&self, id: &OrganizerId, action: &OrganizerAction) -> Result<(), Box<dyn Error>> {
        self.send_request(folder_action_request(id, action)).await?;
        Ok(())
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<FolderPayload, Box<dyn Error>> {
        let root = self.send_request(create_folder_request(request)).await?;

        let folder = find_elem(&root, "CreateFolderResponse")
            .and_then(|response| find_elem(response, "folder"));
        match folder {
            None => Err(format!("No folder in the response to the creation of {:?}", request.name()).into()),
            Some(folder) => FolderPayload::try_from(folder),
        }
    }
}
