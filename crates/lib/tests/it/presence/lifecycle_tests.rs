//! A client session: bootstrap from the server, edit, log out.

use std::sync::{Arc, Mutex};

use gatehouse::{Presence, PresenceStore, UserData, UserPatch};

use crate::helpers::TestContext;

#[tokio::test]
async fn login_edit_logout() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;
    let layout = ctx.resolver.load(&ctx.cookies(&token)).await.unwrap();

    let store = PresenceStore::new();
    let seen: Arc<Mutex<Vec<UserData>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = store.subscribe(move |value: &UserData| {
        sink.lock().unwrap().push(value.clone());
    });

    store.bootstrap(&layout);
    assert_eq!(
        store.presence(),
        Presence::Authenticated {
            id: user.id.clone(),
            username: "alice".to_string(),
            email: None,
        }
    );

    store.update_user(UserPatch::new().email("alice@example.com"));
    assert_eq!(store.get().email.as_deref(), Some("alice@example.com"));

    store.clear_user();
    assert_eq!(store.get(), UserData::anonymous());
    assert_eq!(store.presence(), Presence::Anonymous);

    let history = seen.lock().unwrap().clone();
    assert_eq!(history.len(), 4);
    assert!(!history[0].is_authenticated);
    assert!(history[1].is_authenticated);
    assert_eq!(history[2].email.as_deref(), Some("alice@example.com"));
    assert_eq!(history[3], UserData::anonymous());

    subscription.unsubscribe();
    store.update_user(UserPatch::new().id("ignored"));
    assert_eq!(seen.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn anonymous_layout_clears_stale_client_state() {
    let ctx = TestContext::new();
    let layout = ctx
        .resolver
        .load(&gatehouse::session::RequestCookies::new())
        .await
        .unwrap();

    let store = PresenceStore::new();
    store.update_user(UserPatch::new().id("old").username("old").authenticated(true));
    store.bootstrap(&layout);

    assert_eq!(store.get(), UserData::anonymous());
}

#[test]
fn updates_from_other_threads_are_all_delivered() {
    let store = PresenceStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = store.subscribe(move |value: &UserData| {
        sink.lock().unwrap().push(value.username.clone());
    });

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                store.update_user(UserPatch::new().username(format!("user{i}")));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Initial call plus one notification per update, whichever thread delivered it
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], None);
    assert_eq!(seen.last().cloned().flatten(), store.get().username);
}
