// Task-Modul: Enthält alle Embassy Tasks
//
// Die Animationen und der Taster laufen gemeinsam im kooperativen
// Scheduler (siehe animation.rs). Daneben laufen nur Infrastruktur-Tasks:
// Netzwerk-Stack und Status-Ausgabe.

pub mod animation;
pub mod status;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use animation::{build_routine, build_task_set, supervise};
pub use status::status_display_task;
pub use wifi::net_task;
