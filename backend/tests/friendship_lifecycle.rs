//! Behavioural tests for the friend request lifecycle and the notifications
//! it emits, driven through the domain services over in-memory repositories.

use std::sync::Arc;

use rstest::{fixture, rstest};

use shelfmate::domain::ports::{
    FriendshipCommand, FriendshipQuery, NotificationCommand, NotificationQuery,
};
use shelfmate::domain::{
    ErrorCode, FriendshipService, FriendshipStatus, Locale, NotificationKind, NotificationLimit,
    NotificationService, Profile, RelationshipView,
};

mod support;

use support::InMemorySocial;

type Friends = FriendshipService<InMemorySocial, InMemorySocial>;
type Inbox = NotificationService<InMemorySocial>;

struct World {
    store: InMemorySocial,
    friends: Friends,
    inbox: Inbox,
    ada: Profile,
    grace: Profile,
}

#[fixture]
fn world() -> World {
    let store = InMemorySocial::default();
    let ada = store.add_reader("ada@example.org", "Ada Lovelace");
    let grace = store.add_reader("grace@example.org", "Grace Hopper");
    let shared = Arc::new(store.clone());
    World {
        friends: FriendshipService::new(shared.clone(), shared.clone()),
        inbox: NotificationService::new(shared),
        store,
        ada,
        grace,
    }
}

#[rstest]
#[tokio::test]
async fn request_then_accept_notifies_requester(world: World) {
    let World {
        store,
        friends,
        inbox,
        ada,
        grace,
    } = world;

    let pending = friends
        .send_request(&ada.id, &grace.id, Locale::En)
        .await
        .expect("request sent");
    assert_eq!(pending.status, FriendshipStatus::Pending);

    let received = store.notifications_for(&grace.id);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, NotificationKind::FriendRequest);
    assert_eq!(received[0].related_user_id.as_ref(), Some(&ada.id));

    let incoming = friends
        .incoming_requests(&grace.id)
        .await
        .expect("incoming requests");
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].requester.id, ada.id);

    let accepted = friends
        .accept(&grace.id, &pending.id, Locale::En)
        .await
        .expect("request accepted");
    assert_eq!(accepted.status, FriendshipStatus::Accepted);
    assert_eq!(accepted.requester_id, ada.id);
    assert_eq!(accepted.addressee_id, grace.id);

    let ada_inbox = inbox
        .list(&ada.id, NotificationLimit::default())
        .await
        .expect("ada inbox");
    assert_eq!(ada_inbox.len(), 1);
    assert_eq!(ada_inbox[0].kind, NotificationKind::FriendAccepted);
    assert_eq!(ada_inbox[0].related_user_id.as_ref(), Some(&grace.id));

    let view = friends
        .relationship(&ada.id, &grace.id)
        .await
        .expect("relationship");
    assert_eq!(view.status, RelationshipView::Friends);
    let ada_friends = friends.friends(&ada.id).await.expect("friends");
    assert_eq!(ada_friends.len(), 1);
    assert_eq!(ada_friends[0].id, grace.id);
}

#[rstest]
#[tokio::test]
async fn rejecting_removes_the_row_and_allows_resending(world: World) {
    let pending = world
        .friends
        .send_request(&world.ada.id, &world.grace.id, Locale::Tr)
        .await
        .expect("request sent");

    world
        .friends
        .remove(&world.grace.id, &pending.id)
        .await
        .expect("request rejected");
    assert_eq!(world.store.friendship_count(), 0);

    let resent = world
        .friends
        .send_request(&world.ada.id, &world.grace.id, Locale::Tr)
        .await
        .expect("request sent again");
    assert_eq!(resent.status, FriendshipStatus::Pending);
    assert_ne!(resent.id, pending.id);
}

#[rstest]
#[tokio::test]
async fn reverse_request_conflicts_with_pending_pair(world: World) {
    world
        .friends
        .send_request(&world.ada.id, &world.grace.id, Locale::En)
        .await
        .expect("request sent");

    let err = world
        .friends
        .send_request(&world.grace.id, &world.ada.id, Locale::En)
        .await
        .expect_err("pair already linked");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(world.store.friendship_count(), 1);
}

#[rstest]
#[tokio::test]
async fn requester_cannot_accept_own_request(world: World) {
    let pending = world
        .friends
        .send_request(&world.ada.id, &world.grace.id, Locale::En)
        .await
        .expect("request sent");

    let err = world
        .friends
        .accept(&world.ada.id, &pending.id, Locale::En)
        .await
        .expect_err("only the addressee accepts");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(world.store.notifications_for(&world.ada.id).is_empty());
}

#[rstest]
#[tokio::test]
async fn marking_one_notification_leaves_the_rest_unread(world: World) {
    let linus = world.store.add_reader("linus@example.org", "Linus");
    for requester in [&world.ada.id, &linus.id] {
        world
            .friends
            .send_request(requester, &world.grace.id, Locale::En)
            .await
            .expect("request sent");
    }
    let notifications = world.store.notifications_for(&world.grace.id);
    assert_eq!(notifications.len(), 2);

    world
        .inbox
        .mark_read(&world.grace.id, &notifications[0].id)
        .await
        .expect("marked read");

    let after = world.store.notifications_for(&world.grace.id);
    assert!(after[0].is_read);
    assert!(!after[1].is_read);
    assert_eq!(
        world
            .inbox
            .unread_count(&world.grace.id)
            .await
            .expect("unread count"),
        1
    );
}

#[rstest]
#[tokio::test]
async fn foreign_notification_cannot_be_marked(world: World) {
    world
        .friends
        .send_request(&world.ada.id, &world.grace.id, Locale::En)
        .await
        .expect("request sent");
    let grace_notification = world.store.notifications_for(&world.grace.id)[0].id;

    let err = world
        .inbox
        .mark_read(&world.ada.id, &grace_notification)
        .await
        .expect_err("not ada's notification");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(!world.store.notifications_for(&world.grace.id)[0].is_read);
}

#[rstest]
#[case(Locale::En, "New Friend Request")]
#[case(Locale::Tr, "Yeni Arkadaşlık İsteği")]
#[tokio::test]
async fn notification_text_follows_sender_language(
    world: World,
    #[case] locale: Locale,
    #[case] expected_title: &str,
) {
    world
        .friends
        .send_request(&world.ada.id, &world.grace.id, locale)
        .await
        .expect("request sent");
    let notifications = world.store.notifications_for(&world.grace.id);
    assert_eq!(notifications[0].title, expected_title);
    assert!(notifications[0].message.contains("Ada Lovelace"));
}
