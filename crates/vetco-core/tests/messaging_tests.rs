//! Messaging integration tests: sends, scheduled replies and unread flags.

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vetco_core::config::{MessagingConfig, ReplyConfig, ReplyMode};
use vetco_core::db::Database;
use vetco_core::messaging::Messenger;
use vetco_core::models::{Farmer, Role, Vet};

fn setup() -> (Database, Farmer, Vet) {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::open_in_memory().unwrap();
    let farmer = Farmer::new(
        "John Doe".to_string(),
        "Kampala, Uganda".to_string(),
        "+256 700 123 456".to_string(),
    );
    let vet = Vet::new(
        "Dr. Joseph Mukasa".to_string(),
        "Large Animal Specialist".to_string(),
        "Kampala, Uganda".to_string(),
    );
    db.insert_farmer(&farmer).unwrap();
    db.insert_vet(&vet).unwrap();
    (db, farmer, vet)
}

#[test]
fn test_vet_reply_arrives_after_delay() {
    let (db, farmer, vet) = setup();
    let config = MessagingConfig::default();
    let mut messenger = Messenger::new(&db, &config);

    let thread = messenger.open_with(&farmer.id, &vet.id, Role::Farmer).unwrap();
    assert!(thread.messages.is_empty());
    let conversation_id = thread.conversation.id;

    let t0 = Utc.with_ymd_and_hms(2023, 12, 14, 10, 30, 0).unwrap();
    let sent = messenger
        .send(conversation_id, Role::Farmer, "Is Friday still on?", t0)
        .unwrap()
        .unwrap();
    let due = sent.reply_due_at_ms.unwrap();
    assert_eq!(due - t0.timestamp_millis(), 2_000);

    // Not yet due
    let early = Utc.timestamp_millis_opt(due - 1).unwrap();
    assert!(messenger.deliver_due_replies(early).unwrap().is_empty());

    let late = Utc.timestamp_millis_opt(due).unwrap();
    let delivered = messenger.deliver_due_replies(late).unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].sender, Role::Vet);
    assert_eq!(delivered[0].text, config.vet_reply.text);

    // Delivered once only
    assert!(messenger.deliver_due_replies(late).unwrap().is_empty());

    let thread = messenger.open(conversation_id, Role::Farmer).unwrap();
    let senders: Vec<Role> = thread.messages.iter().map(|m| m.sender).collect();
    assert_eq!(senders, vec![Role::Farmer, Role::Vet]);
    assert_eq!(thread.conversation.last_message, config.vet_reply.text);
}

#[test]
fn test_unread_flags_follow_sender() {
    let (db, farmer, vet) = setup();
    let config = MessagingConfig {
        vet_reply: ReplyConfig {
            mode: ReplyMode::Never,
            ..ReplyConfig::default()
        },
        ..MessagingConfig::default()
    };
    let mut messenger = Messenger::new(&db, &config);
    let id = messenger
        .open_with(&farmer.id, &vet.id, Role::Farmer)
        .unwrap()
        .conversation
        .id;

    let t0 = Utc.with_ymd_and_hms(2023, 12, 14, 10, 30, 0).unwrap();
    let sent = messenger
        .send(id, Role::Farmer, "Hello doctor", t0)
        .unwrap()
        .unwrap();
    assert_eq!(sent.reply_due_at_ms, None);

    assert_eq!(messenger.unread_count(Role::Vet, &vet.id).unwrap(), 1);
    assert_eq!(messenger.unread_count(Role::Farmer, &farmer.id).unwrap(), 0);

    messenger.open(id, Role::Vet).unwrap();
    assert_eq!(messenger.unread_count(Role::Vet, &vet.id).unwrap(), 0);
}

#[test]
fn test_blank_message_is_ignored() {
    let (db, farmer, vet) = setup();
    let config = MessagingConfig::default();
    let mut messenger = Messenger::new(&db, &config).with_rng(StdRng::seed_from_u64(7));
    let id = messenger
        .open_with(&farmer.id, &vet.id, Role::Vet)
        .unwrap()
        .conversation
        .id;

    let t0 = Utc.with_ymd_and_hms(2023, 12, 14, 10, 30, 0).unwrap();
    assert!(messenger.send(id, Role::Vet, "   ", t0).unwrap().is_none());
    assert!(messenger.open(id, Role::Vet).unwrap().messages.is_empty());
    assert!(db.list_scheduled_replies(id).unwrap().is_empty());
}

#[test]
fn test_conversation_search() {
    let (db, farmer, vet) = setup();
    let config = MessagingConfig::default();
    let mut messenger = Messenger::new(&db, &config);
    let id = messenger
        .open_with(&farmer.id, &vet.id, Role::Farmer)
        .unwrap()
        .conversation
        .id;
    let t0 = Utc.with_ymd_and_hms(2023, 12, 14, 10, 30, 0).unwrap();
    messenger
        .send(id, Role::Farmer, "My chickens are coughing", t0)
        .unwrap();

    assert_eq!(
        messenger.conversations(Role::Vet, &vet.id, "john").unwrap().len(),
        1
    );
    assert_eq!(
        messenger
            .conversations(Role::Vet, &vet.id, "chickens")
            .unwrap()
            .len(),
        1
    );
    assert!(messenger
        .conversations(Role::Vet, &vet.id, "goats")
        .unwrap()
        .is_empty());
}
