//! A tree of organizers, kept consistent with the server by applying its notifications

use std::collections::{HashMap, HashSet};

use crate::error::OrganizerError;
use crate::event::{EventSender, EventType, Field, OrganizerEvent};
use crate::organizer::{OrganizerId, OrganizerKind, ViewType};
use crate::organizer::node::OrganizerNode;
use crate::organizer::share::{Permissions, Share};
use crate::organizer::sort::sort_index;
use crate::payload::{Acl, FolderPayload, Grant};

/// Name the server gives to the root of every account
const ROOT_RAW_NAME: &str = "USER_ROOT";


/// The organizers of one view (e.g. every calendar of an account), indexed by ID.
///
/// This owns every node. Nodes refer to their parent and children by ID, and the children of a node are always kept sorted.
#[derive(Debug)]
pub struct OrganizerTree {
    view: ViewType,
    root: OrganizerId,
    nodes: HashMap<OrganizerId, OrganizerNode>,

    listeners: Vec<EventSender>,
}

impl OrganizerTree {
    /// Create a tree that only has a root
    pub fn new(view: ViewType) -> Self {
        let root = OrganizerNode::new(OrganizerId::root(), ROOT_RAW_NAME.to_string(), None, None, false, OrganizerKind::for_view(view));
        let mut nodes = HashMap::new();
        nodes.insert(OrganizerId::root(), root);
        Self {
            view,
            root: OrganizerId::root(),
            nodes,
            listeners: Vec::new(),
        }
    }

    /// Build a whole tree from the payload of its root, as sent by the server e.g. on login
    pub fn from_payload(view: ViewType, payload: &FolderPayload) -> Result<Self, OrganizerError> {
        let root_id = payload.id.clone().ok_or(OrganizerError::MissingId)?;
        let root = build_node(view, None, &root_id, payload, false);

        let mut nodes = HashMap::new();
        nodes.insert(root_id.clone(), root);
        let mut tree = Self {
            view,
            root: root_id.clone(),
            nodes,
            listeners: Vec::new(),
        };
        tree.hydrate_children(&root_id, payload);
        log::debug!("Loaded a tree of {} organizers", tree.len());
        Ok(tree)
    }

    pub fn view(&self) -> ViewType {
        self.view
    }

    pub fn root(&self) -> &OrganizerNode {
        // The root can never be removed from the map
        &self.nodes[&self.root]
    }

    pub fn root_id(&self) -> &OrganizerId {
        &self.root
    }

    pub fn get(&self, id: &OrganizerId) -> Option<&OrganizerNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &OrganizerId) -> Option<&mut OrganizerNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &OrganizerId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The number of organizers in this tree. The root is not counted
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The children of an organizer, in display order
    pub fn children(&self, id: &OrganizerId) -> Vec<&OrganizerNode> {
        match self.nodes.get(id) {
            None => Vec::new(),
            Some(node) => node.children.iter()
                .filter_map(|child_id| self.nodes.get(child_id))
                .collect(),
        }
    }

    /// Find a child of `parent` by its name (case-insensitive)
    pub fn child_by_name(&self, parent: &OrganizerId, name: &str) -> Option<&OrganizerNode> {
        let name = name.to_lowercase();
        self.children(parent)
            .into_iter()
            .find(|child| child.name().to_lowercase() == name)
    }

    /// Every organizer but the root, parents before their children, siblings in display order
    pub fn depth_first(&self) -> Vec<&OrganizerNode> {
        let mut result = Vec::new();
        let mut stack: Vec<&OrganizerId> = self.root().children.iter().rev().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id) {
                result.push(node);
                stack.extend(node.children.iter().rev());
            }
        }
        result
    }

    /// Whether `id` is `ancestor` or somewhere below it
    pub fn is_in_subtree(&self, id: &OrganizerId, ancestor: &OrganizerId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|n| n.parent.as_ref());
        }
        false
    }

    /// Register a listener, that will receive every [`OrganizerEvent`] of this tree
    pub fn add_listener(&mut self, listener: EventSender) {
        self.listeners.push(listener);
    }


    /// Build an organizer (and its subtree) from a server payload, and attach it to `parent`.
    ///
    /// Returns `Ok(None)` without changing anything in case the payload has no ID.
    /// This does not raise any event, see [`Self::notify_create`] for that.
    pub fn create_from_payload(&mut self, parent: &OrganizerId, payload: &FolderPayload, is_link: bool) -> Result<Option<OrganizerId>, OrganizerError> {
        let id = match &payload.id {
            None => {
                log::warn!("Ignoring an organizer payload without ID (name {:?})", payload.name);
                return Ok(None);
            },
            Some(id) => id.clone(),
        };
        if self.nodes.contains_key(parent) == false {
            return Err(OrganizerError::ParentNotFound(parent.clone()));
        }
        if self.nodes.contains_key(&id) {
            return Err(OrganizerError::DuplicateId(id));
        }

        let node = build_node(self.view, Some(parent.clone()), &id, payload, is_link);
        self.nodes.insert(id.clone(), node);
        self.attach_sorted(parent, &id)?;
        self.hydrate_children(&id, payload);
        Ok(Some(id))
    }

    fn hydrate_children(&mut self, id: &OrganizerId, payload: &FolderPayload) {
        let owned = payload.folder.iter().map(|child| (child, false));
        let links = payload.link.iter().map(|child| (child, true));

        for (child, is_link) in owned.chain(links) {
            if child.is_view(self.view) == false {
                continue;
            }
            if let Err(err) = self.create_from_payload(id, child, is_link) {
                log::warn!("Unable to add a child to organizer {}: {}. Skipping it", id, err);
            }
        }
    }

    /// Insert `child` among the children of `parent`, at its sorted position
    fn attach_sorted(&mut self, parent: &OrganizerId, child: &OrganizerId) -> Result<(), OrganizerError> {
        let index = {
            let node = self.nodes.get(child).ok_or_else(|| OrganizerError::NotFound(child.clone()))?;
            let parent_node = self.nodes.get(parent).ok_or_else(|| OrganizerError::ParentNotFound(parent.clone()))?;
            sort_index(&parent_node.children, node, |id| self.nodes.get(id))
        };

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.insert(index, child.clone());
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent.clone());
        }
        Ok(())
    }

    fn detach(&mut self, id: &OrganizerId) {
        let parent = self.nodes.get(id).and_then(|n| n.parent.clone());
        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_node.children.retain(|child| child != id);
        }
    }


    /// The server notified the creation of an organizer under `parent`
    pub fn notify_create(&mut self, parent: &OrganizerId, payload: &FolderPayload, is_link: bool) -> Result<Option<OrganizerId>, OrganizerError> {
        let created = self.create_from_payload(parent, payload, is_link)?;
        if let Some(id) = &created {
            self.notify(OrganizerEvent::new(EventType::Create, id.clone()));
        }
        Ok(created)
    }

    /// The server notified a modification of an organizer.
    ///
    /// An event is raised only for the fields whose value actually changed.
    /// An organizer moved under a parent that is not part of this tree (e.g. the trash) is removed from it.
    pub fn notify_modify(&mut self, id: &OrganizerId, payload: &FolderPayload) -> Result<(), OrganizerError> {
        self.notify_modify_common(id, payload)?;

        let mut fields = HashSet::new();
        if let Some(node) = self.nodes.get_mut(id) {
            if let (Some(new_value), OrganizerKind::Calendar{ exclude_free_busy }) = (payload.exclude_free_busy, node.kind_mut()) {
                if *exclude_free_busy != new_value {
                    *exclude_free_busy = new_value;
                    fields.insert(Field::ExcludeFreeBusy);
                }
            }
        }
        if fields.is_empty() == false {
            self.notify(OrganizerEvent::modified(id.clone(), fields));
        }

        // Applied last: the other fields are kept even if the move fails
        match &payload.parent_id {
            Some(new_parent) => self.notify_move(id, new_parent),
            None => Ok(()),
        }
    }

    /// Handles the fields every organizer kind has
    fn notify_modify_common(&mut self, id: &OrganizerId, payload: &FolderPayload) -> Result<(), OrganizerError> {
        let node = self.nodes.get_mut(id).ok_or_else(|| OrganizerError::NotFound(id.clone()))?;

        let mut fields = HashSet::new();
        if let Some(name) = &payload.name {
            if node.raw_name() != name {
                node.set_name(name.clone());
                fields.insert(Field::Name);
            }
        }
        if let Some(color) = payload.color {
            if node.color() != color {
                node.set_color(color);
                fields.insert(Field::Color);
            }
        }
        let current_parent = node.parent.clone();

        if fields.contains(&Field::Name) {
            if let Some(parent) = &current_parent {
                self.detach(id);
                self.attach_sorted(parent, id)?;
            }
        }
        if fields.is_empty() == false {
            self.notify(OrganizerEvent::modified(id.clone(), fields));
        }
        Ok(())
    }

    fn notify_move(&mut self, id: &OrganizerId, new_parent: &OrganizerId) -> Result<(), OrganizerError> {
        let current_parent = self.nodes.get(id).and_then(|n| n.parent.as_ref());
        if current_parent == Some(new_parent) {
            return Ok(());
        }
        if self.nodes.contains_key(new_parent) == false {
            log::debug!("Organizer {} moved to {}, that is not in this tree", id, new_parent);
            return self.notify_delete(id);
        }

        self.reparent(id, new_parent)?;
        let mut event = OrganizerEvent::new(EventType::Move, id.clone());
        event.fields.insert(Field::Parent);
        self.notify(event);
        Ok(())
    }

    fn reparent(&mut self, id: &OrganizerId, new_parent: &OrganizerId) -> Result<(), OrganizerError> {
        if id == &self.root || self.is_in_subtree(new_parent, id) {
            return Err(OrganizerError::InvalidMove(id.clone(), new_parent.clone()));
        }
        self.detach(id);
        self.attach_sorted(new_parent, id)
    }

    /// The server notified the deletion of an organizer. Its whole subtree is removed.
    pub fn notify_delete(&mut self, id: &OrganizerId) -> Result<(), OrganizerError> {
        if id == &self.root {
            return Err(OrganizerError::CannotDeleteRoot);
        }
        if self.nodes.contains_key(id) == false {
            return Err(OrganizerError::NotFound(id.clone()));
        }

        self.detach(id);
        let mut to_remove = vec![id.clone()];
        while let Some(current) = to_remove.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                to_remove.extend(node.children);
            }
        }
        self.notify(OrganizerEvent::new(EventType::Delete, id.clone()));
        Ok(())
    }

    fn notify(&mut self, event: OrganizerEvent) {
        log::debug!("Organizer event: {}", event);
        self.listeners.retain(|listener| listener.send(event.clone()).is_ok());
    }


    /// Describe the whole tree as a payload, that [`Self::from_payload`] can load back
    pub fn to_payload(&self) -> FolderPayload {
        self.node_to_payload(&self.root)
    }

    fn node_to_payload(&self, id: &OrganizerId) -> FolderPayload {
        let node = match self.nodes.get(id) {
            None => return FolderPayload::default(),
            Some(n) => n,
        };

        let mut payload = FolderPayload {
            id: Some(node.id().clone()),
            name: Some(node.raw_name().to_string()),
            color: Some(node.color()),
            url: node.url().cloned(),
            owner: node.owner().map(String::from),
            exclude_free_busy: match node.kind() {
                OrganizerKind::Calendar{ exclude_free_busy } => Some(*exclude_free_busy),
                OrganizerKind::TaskList => None,
            },
            view: Some(self.view.as_tag().to_string()),
            parent_id: node.parent().cloned(),
            acl: shares_to_acl(node.shares()),
            ..FolderPayload::default()
        };

        for child_id in node.children() {
            let child_payload = self.node_to_payload(child_id);
            match self.nodes.get(child_id).map(|c| c.is_link()) {
                Some(true) => payload.link.push(child_payload),
                Some(false) => payload.folder.push(child_payload),
                None => continue,
            }
        }
        payload
    }
}


fn build_node(view: ViewType, parent: Option<OrganizerId>, id: &OrganizerId, payload: &FolderPayload, is_link: bool) -> OrganizerNode {
    let mut kind = OrganizerKind::for_view(view);
    if let OrganizerKind::Calendar{ exclude_free_busy } = &mut kind {
        *exclude_free_busy = payload.exclude_free_busy.unwrap_or(false);
    }

    let name = payload.name.clone().unwrap_or_default();
    let mut node = OrganizerNode::new(id.clone(), name, parent, payload.color, is_link, kind);
    node.set_url(payload.url.clone());
    node.set_owner(payload.owner.clone());

    if let Some(acl) = &payload.acl {
        for grant in &acl.grant {
            node.add_share(Share::new(grant.gt.clone(), grant.zid.clone(), grant.d.clone(), Permissions::from_letters(&grant.perm)));
        }
    }
    node
}

fn shares_to_acl(shares: &[Share]) -> Option<Acl> {
    if shares.is_empty() {
        return None;
    }
    let grant = shares.iter()
        .map(|share| Grant {
            gt: share.grantee_type().map(String::from),
            zid: share.grantee_id().map(String::from),
            d: share.grantee_name().map(String::from),
            perm: share.permissions().to_letters(),
        })
        .collect();
    Some(Acl { grant })
}
