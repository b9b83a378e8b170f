//! Behaviour tests for the join walkthrough.
//!
//! Scenarios run the membership service over the in-memory adapters and
//! check outcomes, redirect targets, and attendee counts.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use trips_backend::domain::ports::CallerIdentity;
use trips_backend::domain::{
    JoinCode, JoinOutcome, Membership, Trip, TripId, TripMembershipService, UserId,
};
use trips_backend::outbound::memory::{InMemoryIdentityProvider, InMemoryTripStore};

type Service = TripMembershipService<InMemoryTripStore, InMemoryIdentityProvider>;

struct JoinWorld {
    runtime: Runtime,
    store: Arc<InMemoryTripStore>,
    service: Service,
    trips: RefCell<HashMap<String, TripId>>,
    users: RefCell<HashMap<String, UserId>>,
    last_outcome: RefCell<Option<JoinOutcome>>,
}

impl JoinWorld {
    fn new() -> Self {
        let store = Arc::new(InMemoryTripStore::default());
        let service = TripMembershipService::new(
            store.clone(),
            Arc::new(InMemoryIdentityProvider::auto_provisioning()),
        );
        Self {
            runtime: Runtime::new().expect("create runtime"),
            store,
            service,
            trips: RefCell::new(HashMap::new()),
            users: RefCell::new(HashMap::new()),
            last_outcome: RefCell::new(None),
        }
    }

    fn trip_id(&self, label: &str) -> TripId {
        *self
            .trips
            .borrow_mut()
            .entry(label.to_owned())
            .or_insert_with(TripId::random)
    }

    fn user_id(&self, label: &str) -> UserId {
        *self
            .users
            .borrow_mut()
            .entry(label.to_owned())
            .or_insert_with(UserId::random)
    }

    fn join(&self, trip: &str, code: &str, caller: CallerIdentity) {
        let trip_id = self.trip_id(trip);
        let outcome = self
            .runtime
            .block_on(self.service.validate_and_join(trip_id, code, &caller));
        *self.last_outcome.borrow_mut() = Some(outcome);
    }

    fn membership(&self, trip: &str) -> Membership {
        self.last_outcome
            .borrow()
            .clone()
            .expect("a join was attempted")
            .into_result(self.trip_id(trip))
            .expect("join succeeded")
    }
}

#[fixture]
fn world() -> JoinWorld {
    JoinWorld::new()
}

#[given("a trip \"{trip}\" owned by \"{owner}\" with join code \"{code}\"")]
fn a_trip_with_join_code(world: &JoinWorld, trip: String, owner: String, code: String) {
    let seeded = Trip {
        id: world.trip_id(&trip),
        owner_id: world.user_id(&owner),
        name: format!("Trip {trip}"),
        join_code: JoinCode::new(code).expect("valid join code"),
        created_at: Utc::now(),
    };
    world.store.seed_trip(seeded).expect("seed trip");
}

#[when("\"{user}\" joins trip \"{trip}\" with code \"{code}\"")]
fn user_joins_trip(world: &JoinWorld, user: String, trip: String, code: String) {
    let caller = CallerIdentity::authenticated(world.user_id(&user));
    world.join(&trip, &code, caller);
}

#[when("an anonymous caller joins trip \"{trip}\" with code \"{code}\"")]
fn anonymous_joins_trip(world: &JoinWorld, trip: String, code: String) {
    world.join(&trip, &code, CallerIdentity::anonymous());
}

#[then("the outcome is \"{expected}\"")]
fn the_outcome_is(world: &JoinWorld, expected: String) {
    let outcome = world.last_outcome.borrow();
    let outcome = outcome.as_ref().expect("a join was attempted");
    assert_eq!(outcome.kind().as_str(), expected);
}

#[then("the redirect target is the detail view of trip \"{trip}\"")]
fn the_redirect_target_is(world: &JoinWorld, trip: String) {
    let membership = world.membership(&trip);
    assert_eq!(
        membership.redirect_path(),
        format!("/trips/{}", world.trip_id(&trip))
    );
}

#[then("trip \"{trip}\" has {count} attendees")]
fn trip_has_attendees(world: &JoinWorld, trip: String, count: usize) {
    let actual = world
        .store
        .attendee_count(&world.trip_id(&trip))
        .expect("count attendees");
    assert_eq!(actual, count);
}

#[scenario(path = "tests/features/join_flow.feature")]
fn join_flow_scenarios(world: JoinWorld) {
    drop(world);
}
