use super::*;

#[test]
fn default_starts_at_root() {
    assert_eq!(MemoryNavigator::default().current_path(), "/");
}

#[test]
fn push_adds_history() {
    let nav = MemoryNavigator::at("/especialidades");
    nav.navigate("/turnos/cardiologia", NavMode::Push);
    assert_eq!(nav.current_path(), "/turnos/cardiologia");
    assert_eq!(nav.back().as_deref(), Some("/especialidades"));
}

#[test]
fn replace_drops_the_replaced_entry() {
    let nav = MemoryNavigator::at("/");
    nav.navigate("/cliente/citas", NavMode::Push);
    nav.navigate("/login", NavMode::Replace);
    assert_eq!(nav.current_path(), "/login");
    // Back skips the protected page that was replaced.
    assert_eq!(nav.back().as_deref(), Some("/"));
}

#[test]
fn reload_resets_history() {
    let nav = MemoryNavigator::at("/cliente");
    nav.navigate("/cliente/citas", NavMode::Push);
    nav.navigate("/login", NavMode::Reload);
    assert_eq!(nav.history(), vec![NavEntry { path: "/login".into(), mode: NavMode::Reload }]);
    assert!(nav.back().is_none());
}
