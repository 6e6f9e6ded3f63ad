//! Requests are only sent to the server: the tree changes once the server notifies the change

use std::convert::TryFrom;

use minidom::Element;

use organizer_tree::mock_behaviour::MockBehaviour;
use organizer_tree::mock_transport::MockTransport;
use organizer_tree::notify::{apply_notifications, DeletedIds, FolderList, NotifyBlock};
use organizer_tree::{Color, FolderPayload, OrganizerId, OrganizerNode, OrganizerTree, ViewType};

fn populated_tree() -> OrganizerTree {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut tree = OrganizerTree::new(ViewType::Calendar);
    let calendar = FolderPayload {
        name: Some("Calendar".to_string()),
        view: Some("appointment".to_string()),
        ..FolderPayload::with_id(OrganizerId::CALENDAR)
    };
    tree.notify_create(&OrganizerId::root(), &calendar, false).unwrap();
    tree
}

fn modification(id: &str, payload: FolderPayload) -> NotifyBlock {
    NotifyBlock {
        modified: Some(FolderList { folder: vec![FolderPayload { id: Some(OrganizerId::from(id)), ..payload }], link: Vec::new() }),
        ..NotifyBlock::default()
    }
}


#[tokio::test]
async fn test_free_busy_is_applied_on_notification_only() {
    let mut tree = populated_tree();
    let transport = MockTransport::new();
    let id = OrganizerId::from(OrganizerId::CALENDAR);

    // Already in this state: nothing is sent
    let sent = tree.get(&id).unwrap().set_free_busy_exclusion(false, &transport).await.unwrap();
    assert!(sent == false);
    assert!(transport.actions().is_empty());

    let sent = tree.get(&id).unwrap().set_free_busy_exclusion(true, &transport).await.unwrap();
    assert!(sent);
    assert!(tree.get(&id).unwrap().exclude_free_busy() == false);

    let actions = transport.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].0, id);
    assert_eq!(actions[0].1.action(), "fb");
    assert_eq!(actions[0].1.attrs().get("excludeFreeBusy").map(String::as_str), Some("1"));

    // The server confirms
    let block = modification(OrganizerId::CALENDAR, FolderPayload { exclude_free_busy: Some(true), ..FolderPayload::default() });
    assert!(apply_notifications(&mut tree, &block));
    assert!(tree.get(&id).unwrap().exclude_free_busy());

    // Asking again is a no-op
    let sent = tree.get(&id).unwrap().set_free_busy_exclusion(true, &transport).await.unwrap();
    assert!(sent == false);
    assert_eq!(transport.actions().len(), 1);
}

#[tokio::test]
async fn test_failed_requests_change_nothing() {
    let tree = populated_tree();
    let transport = MockTransport::with_behaviour(MockBehaviour::fail_now(1));
    let id = OrganizerId::from(OrganizerId::CALENDAR);
    let calendar = tree.get(&id).unwrap();

    assert!(calendar.set_free_busy_exclusion(true, &transport).await.is_err());
    assert!(calendar.exclude_free_busy() == false);
    assert!(transport.actions().is_empty());

    // The caller may retry
    assert!(calendar.set_free_busy_exclusion(true, &transport).await.unwrap());
    assert_eq!(transport.actions().len(), 1);
}

#[tokio::test]
async fn test_other_actions() {
    let mut tree = populated_tree();
    let transport = MockTransport::new();
    let id = OrganizerId::from(OrganizerId::CALENDAR);

    {
        let calendar = tree.get(&id).unwrap();
        assert!(calendar.rename("Calendar", &transport).await.unwrap() == false);
        assert!(calendar.rename("bad/name", &transport).await.is_err());
        assert!(calendar.rename("Agenda", &transport).await.unwrap());
        assert!(calendar.change_color(Color::default(), &transport).await.unwrap() == false);
        assert!(calendar.change_color(Color::Green, &transport).await.unwrap());
        assert!(calendar.move_to(&OrganizerId::root(), &transport).await.unwrap() == false);
        assert!(calendar.move_to(&id, &transport).await.is_err());
        calendar.delete(&transport).await.unwrap();
        assert!(tree.root().delete(&transport).await.is_err());
    }

    let actions: Vec<String> = transport.actions().iter().map(|(_, a)| a.action().to_string()).collect();
    assert_eq!(actions, vec!["rename", "color", "delete"]);
    assert_eq!(transport.actions()[1].1.attrs().get("color").map(String::as_str), Some("3"));

    // Nothing changed locally
    assert_eq!(tree.get(&id).unwrap().name(), "Calendar");
    assert_eq!(tree.get(&id).unwrap().color(), Color::default());

    let block = NotifyBlock {
        modified: Some(FolderList {
            folder: vec![FolderPayload { name: Some("Agenda".to_string()), color: Some(Color::Green), ..FolderPayload::with_id(OrganizerId::CALENDAR) }],
            link: Vec::new(),
        }),
        deleted: Some(DeletedIds { id: format!("{},4242", OrganizerId::CALENDAR) }),
        ..NotifyBlock::default()
    };
    assert!(apply_notifications(&mut tree, &block));
    assert!(tree.contains(&id) == false);
}

#[tokio::test]
async fn test_create() {
    let mut tree = populated_tree();
    let transport = MockTransport::new();

    assert!(OrganizerNode::create(&transport, ViewType::Calendar, "", None, None).await.is_err());
    assert!(transport.created().is_empty());

    let url = "https://feeds.example.com/holidays.ics".parse().unwrap();
    let created = OrganizerNode::create(&transport, ViewType::Calendar, "Holidays", None, Some(&url)).await.unwrap();
    let requests = transport.created();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].parent_id(), &OrganizerId::root());
    assert_eq!(requests[0].view(), ViewType::Calendar);

    // Not in the tree until the server notifies the creation
    let new_id = created.id.clone().unwrap();
    assert!(tree.contains(&new_id) == false);

    let block = NotifyBlock {
        created: Some(FolderList { folder: vec![created], link: Vec::new() }),
        ..NotifyBlock::default()
    };
    assert!(apply_notifications(&mut tree, &block));
    let holidays = tree.get(&new_id).unwrap();
    assert_eq!(holidays.name(), "Holidays");
    assert_eq!(holidays.url(), Some(&url));

    // A second creation of the same organizer is an error
    assert!(apply_notifications(&mut tree, &block) == false);
}

#[test]
fn test_xml_notifications() {
    let mut tree = populated_tree();

    let xml = r#"<notify xmlns="urn:zimbra">
            <created>
                <folder xmlns="urn:zimbraMail" id="300" name="Work" l="1" view="appointment" color="4"/>
                <folder xmlns="urn:zimbraMail" id="301" name="Drafts 2" l="1" view="message"/>
                <link xmlns="urn:zimbraMail" id="302" name="Bob's" l="10" view="appointment" d="bob@example.com"/>
                <m xmlns="urn:zimbraMail" id="900"/>
            </created>
            <modified>
                <folder xmlns="urn:zimbraMail" id="300" excludeFreeBusy="1"/>
                <folder xmlns="urn:zimbraMail" id="2" u="3"/>
            </modified>
        </notify>"#;
    let el: Element = xml.parse().unwrap();
    let block = NotifyBlock::try_from(&el).unwrap();
    assert!(apply_notifications(&mut tree, &block));

    let work = tree.get(&OrganizerId::from("300")).unwrap();
    assert_eq!(work.color(), Color::Purple);
    assert!(work.exclude_free_busy());
    assert!(tree.contains(&OrganizerId::from("301")) == false);

    let bob = tree.get(&OrganizerId::from("302")).unwrap();
    assert!(bob.is_link());
    assert_eq!(bob.parent(), Some(&OrganizerId::from(OrganizerId::CALENDAR)));
}
