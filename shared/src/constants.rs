/*!
World and synchronization tunables.

These constants centralize the parameters used by shape creation, the spring
subsystem, and the renderer-facing coordinate projection. Keeping them together
makes tuning easier and helps ensure deterministic behavior across platforms.

Notes
- Distances are in world units (meters), time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Default downward gravity for a freshly initialized world (m/s^2, signed).
pub const DEFAULT_GRAVITY_Y: f32 = -9.81;

/// Fixed simulation step frequency (Hz). One tick advances the solver by
/// exactly `1 / TICK_HZ` seconds.
pub const TICK_HZ: f32 = 60.0;

/// Default collider density for dynamic shapes that don't override it.
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Fill color assigned to shapes created without an explicit style.
pub const DEFAULT_FILL_COLOR: &str = "#888888";

/// Root container for identifier allocation when the caller does not scope
/// entities under its own path.
pub const ROOT_CONTAINER: &str = "/";

/// Container under which spring identifiers are allocated.
pub const SPRING_CONTAINER: &str = "/springs/";
