use async_trait::async_trait;
use record_store::{ActorEntity, Filter, FrameworkError, ResourceActor};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Member {
    id: u32,
    phone: String,
    name: String,
    points: i64,
}

#[derive(Debug)]
struct MemberCreate {
    phone: String,
    name: String,
}

#[derive(Debug)]
struct MemberUpdate {
    phone: Option<String>,
    name: Option<String>,
}

#[derive(Debug)]
enum MemberAction {
    AddPoints(i64),
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum MemberError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("balance would become negative")]
    NegativeBalance,
}

#[async_trait]
impl ActorEntity for Member {
    type Id = u32;
    type Create = MemberCreate;
    type Update = MemberUpdate;
    type Action = MemberAction;
    type ActionResult = i64;
    type Context = ();
    type Error = MemberError;

    fn from_create_params(id: u32, params: MemberCreate) -> Result<Self, Self::Error> {
        if params.name.is_empty() {
            return Err(MemberError::EmptyName);
        }
        Ok(Self {
            id,
            phone: params.phone,
            name: params.name,
            points: 0,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.phone.clone())
    }

    async fn on_update(&mut self, update: MemberUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(name) = update.name {
            if name.is_empty() {
                return Err(MemberError::EmptyName);
            }
            self.name = name;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: MemberAction, _ctx: &()) -> Result<i64, Self::Error> {
        match action {
            MemberAction::AddPoints(delta) => {
                // Mutate before validating to prove a failed action is not committed.
                self.points += delta;
                if self.points < 0 {
                    return Err(MemberError::NegativeBalance);
                }
                Ok(self.points)
            }
        }
    }
}

fn member(phone: &str, name: &str) -> MemberCreate {
    MemberCreate {
        phone: phone.into(),
        name: name.into(),
    }
}

#[tokio::test]
async fn test_store_full_lifecycle() {
    let (actor, client) = ResourceActor::<Member>::new(10);
    tokio::spawn(actor.run(()));

    // 1. Create
    let id = client.create(member("5511900000001", "Ana")).await.unwrap();
    assert_eq!(id, 1);

    // 2. Find by unique key
    let found = client.find_by_key("5511900000001").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, "Ana");

    // 3. Action
    let balance = client
        .perform_action(id, MemberAction::AddPoints(40))
        .await
        .unwrap();
    assert_eq!(balance, 40);

    // 4. Update
    let updated = client
        .update(
            id,
            MemberUpdate {
                phone: None,
                name: Some("Ana Paula".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Ana Paula");
    assert_eq!(updated.points, 40);

    // 5. List
    client.create(member("5511900000002", "Bruno")).await.unwrap();
    let rich = client
        .list(Filter::new(|m: &Member| m.points > 0))
        .await
        .unwrap();
    assert_eq!(rich.len(), 1);
    assert_eq!(rich[0].id, id);
}

#[tokio::test]
async fn test_unique_key_conflict_on_create() {
    let (actor, client) = ResourceActor::<Member>::new(10);
    tokio::spawn(actor.run(()));

    client.create(member("5511900000001", "Ana")).await.unwrap();
    let duplicate = client.create(member("5511900000001", "Other")).await;
    assert!(matches!(duplicate, Err(FrameworkError::Conflict(key)) if key == "5511900000001"));

    // The original row is untouched and ids remain monotonic.
    let all = client.list(Filter::all()).await.unwrap();
    assert_eq!(all.len(), 1);
    let next = client.create(member("5511900000003", "Caio")).await.unwrap();
    assert_eq!(next, 3);
}

#[tokio::test]
async fn test_failed_action_is_not_committed() {
    let (actor, client) = ResourceActor::<Member>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(member("5511900000001", "Ana")).await.unwrap();
    client
        .perform_action(id, MemberAction::AddPoints(10))
        .await
        .unwrap();

    let err = client
        .perform_action(id, MemberAction::AddPoints(-50))
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_entity::<MemberError>().unwrap(),
        MemberError::NegativeBalance
    );

    let stored = client.get(id).await.unwrap().unwrap();
    assert_eq!(stored.points, 10);
}

#[tokio::test]
async fn test_update_reindexes_unique_key() {
    let (actor, client) = ResourceActor::<Member>::new(10);
    tokio::spawn(actor.run(()));

    let ana = client.create(member("5511900000001", "Ana")).await.unwrap();
    client.create(member("5511900000002", "Bruno")).await.unwrap();

    // Taking someone else's key is rejected.
    let clash = client
        .update(
            ana,
            MemberUpdate {
                phone: Some("5511900000002".into()),
                name: None,
            },
        )
        .await;
    assert!(matches!(clash, Err(FrameworkError::Conflict(_))));

    // Moving to a free key releases the old one.
    client
        .update(
            ana,
            MemberUpdate {
                phone: Some("5511900000009".into()),
                name: None,
            },
        )
        .await
        .unwrap();
    assert!(client.find_by_key("5511900000001").await.unwrap().is_none());
    assert_eq!(
        client.find_by_key("5511900000009").await.unwrap().unwrap().id,
        ana
    );
}

#[tokio::test]
async fn test_missing_rows() {
    let (actor, client) = ResourceActor::<Member>::new(10);
    tokio::spawn(actor.run(()));

    assert!(client.get(42).await.unwrap().is_none());
    let err = client
        .perform_action(42, MemberAction::AddPoints(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(id) if id == "42"));

    let invalid = client.create(member("5511900000001", "")).await.unwrap_err();
    assert_eq!(
        invalid.downcast_entity::<MemberError>().unwrap(),
        MemberError::EmptyName
    );
}

#[tokio::test]
async fn test_actor_closed_after_shutdown() {
    let (actor, client) = ResourceActor::<Member>::new(10);
    let handle = tokio::spawn(actor.run(()));
    let probe = client.clone();
    drop(client);
    drop(probe);
    handle.await.unwrap();
}
