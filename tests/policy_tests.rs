use vyuha_gate::{
    models::Role,
    policy::{Access, RoutePolicy},
};

// --- Matching Rules ---

#[test]
fn test_unlisted_paths_default_to_public() {
    let policy = RoutePolicy::vyuha();
    assert_eq!(policy.access_for("/some/new/page"), &Access::Public);
}

#[test]
fn test_matching_respects_segment_boundaries() {
    let policy = RoutePolicy::vyuha();

    // "/profiles" is not "/profile".
    assert_eq!(policy.access_for("/profiles"), &Access::Public);
    assert_eq!(policy.access_for("/profile"), &Access::Session);
    assert_eq!(policy.access_for("/profile/settings"), &Access::Session);
    assert_eq!(policy.access_for("/profile/"), &Access::Session);
}

#[test]
fn test_longest_prefix_wins() {
    let policy = RoutePolicy::vyuha();

    assert_eq!(
        policy.access_for("/dashboard"),
        &Access::AnyRole(vec![Role::Admin, Role::EventLead])
    );
    assert_eq!(
        policy.access_for("/dashboard/admin"),
        &Access::Role(Role::Admin)
    );
    assert_eq!(
        policy.access_for("/dashboard/admin/members/42"),
        &Access::Role(Role::Admin)
    );
    assert_eq!(
        policy.access_for("/dashboard/event-lead/checkins"),
        &Access::Role(Role::EventLead)
    );
    // Unlisted dashboard subtrees inherit the shared requirement.
    assert_eq!(
        policy.access_for("/dashboard/reports"),
        &Access::AnyRole(vec![Role::Admin, Role::EventLead])
    );
}

#[test]
fn test_root_row_covers_only_the_root() {
    let policy = RoutePolicy::new()
        .route("/", Access::Public)
        .route("/profile", Access::Session);

    assert_eq!(policy.access_for("/"), &Access::Public);
    // "/profile" must resolve via its own row, not the root row.
    assert_eq!(policy.access_for("/profile"), &Access::Session);
}

#[test]
fn test_rule_order_does_not_matter() {
    let specific_first = RoutePolicy::new()
        .route("/dashboard/admin", Access::Role(Role::Admin))
        .route("/dashboard", Access::Session);
    let specific_last = RoutePolicy::new()
        .route("/dashboard", Access::Session)
        .route("/dashboard/admin", Access::Role(Role::Admin));

    for policy in [specific_first, specific_last] {
        assert_eq!(
            policy.access_for("/dashboard/admin/x"),
            &Access::Role(Role::Admin)
        );
        assert_eq!(policy.access_for("/dashboard/other"), &Access::Session);
    }
}

// --- The Production Table ---

#[test]
fn test_vyuha_public_surfaces_stay_open() {
    let policy = RoutePolicy::vyuha();

    for path in [
        "/",
        "/auth/sign-in",
        "/events",
        "/courses/rust-101",
        "/jobs",
        "/mentors",
        "/projects",
        "/forum/thread/7",
        "/membership",
        "/health",
        "/swagger-ui",
        "/api-docs/openapi.json",
    ] {
        assert_eq!(
            policy.access_for(path),
            &Access::Public,
            "{} should be public",
            path
        );
    }
}

#[test]
fn test_vyuha_member_areas_need_a_session() {
    let policy = RoutePolicy::vyuha();

    for path in ["/profile", "/quiz", "/quiz/attempt/3", "/resources"] {
        assert_eq!(
            policy.access_for(path),
            &Access::Session,
            "{} should demand a session",
            path
        );
    }
}

// --- Access Helpers ---

#[test]
fn test_required_roles_exposure() {
    assert_eq!(Access::Public.required_roles(), None);
    assert_eq!(Access::Session.required_roles(), None);
    assert_eq!(
        Access::Role(Role::Admin).required_roles(),
        Some([Role::Admin].as_slice())
    );
    assert_eq!(
        Access::AnyRole(vec![Role::Admin, Role::EventLead]).required_roles(),
        Some([Role::Admin, Role::EventLead].as_slice())
    );
}
