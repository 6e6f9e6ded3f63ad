//! An in-memory [`OrganizerTransport`], that records requests instead of sending them

use std::error::Error;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::mock_behaviour::MockBehaviour;
use crate::organizer::OrganizerId;
use crate::payload::{CreateFolderRequest, FolderPayload, OrganizerAction};
use crate::traits::OrganizerTransport;

/// IDs below this one are reserved for system organizers
const FIRST_USER_ID: u32 = 256;

#[derive(Debug)]
struct MockState {
    actions: Vec<(OrganizerId, OrganizerAction)>,
    created: Vec<CreateFolderRequest>,
    next_id: u32,
    behaviour: MockBehaviour,
}

/// A transport that never reaches any server. Created organizers get increasing IDs.
#[derive(Debug)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_behaviour(MockBehaviour::default())
    }

    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            state: Mutex::new(MockState {
                actions: Vec::new(),
                created: Vec::new(),
                next_id: FIRST_USER_ID,
                behaviour,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Every action that has been successfully sent, in order
    pub fn actions(&self) -> Vec<(OrganizerId, OrganizerAction)> {
        self.state().actions.clone()
    }

    /// Every creation request that has been successfully sent, in order
    pub fn created(&self) -> Vec<CreateFolderRequest> {
        self.state().created.clone()
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        self.state().behaviour = behaviour;
    }
}

#[async_trait]
impl OrganizerTransport for MockTransport {
    async fn organizer_action(&self, id: &OrganizerId, action: &OrganizerAction) -> Result<(), Box<dyn Error>> {
        let mut state = self.state();
        state.behaviour.can_run_organizer_action()?;
        state.actions.push((id.clone(), action.clone()));
        Ok(())
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<FolderPayload, Box<dyn Error>> {
        let mut state = self.state();
        state.behaviour.can_create_folder()?;

        let id = OrganizerId::from(state.next_id.to_string());
        state.next_id += 1;
        state.created.push(request.clone());

        Ok(FolderPayload {
            id: Some(id),
            name: Some(request.name().to_string()),
            url: request.url().cloned(),
            view: Some(request.view().as_tag().to_string()),
            parent_id: Some(request.parent_id().clone()),
            ..FolderPayload::default()
        })
    }
}
