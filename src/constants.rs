//! compile‑time tunables; all distances in pixels, y grows downwards

/// -------- tiles & chunks --------
pub const TILE_SIZE: f32  = 16.0;
pub const CHUNK_SIZE: i32 = 8;
/// grass row when the height field is 0
pub const BASE_ROW: i32   = 10;

/// -------- terrain noise --------
pub const NOISE_AMPLITUDE: i32 = 5;
pub const NOISE_FREQUENCY: f64 = 0.1;
/// columns after which the height profile repeats
pub const NOISE_PERIOD: i32    = 1 << 16;
pub const PLANT_CHANCE: f64    = 0.3;
pub const DEFAULT_SEED: u64    = 0x5eed_cafe;

/// -------- viewport --------
pub const VIEWPORT_WIDTH: f32  = 320.0;
pub const VIEWPORT_HEIGHT: f32 = 180.0;
pub const WINDOW_WIDTH: f32    = 1280.0;
pub const WINDOW_HEIGHT: f32   = 720.0;

/// -------- body phys (per frame at 60 Hz) --------
pub const G_FORCE: f32        = 0.14;
pub const MAX_FALL_SPEED: f32 = 3.0;
pub const JUMP_LAUNCH: f32    = -3.0;
pub const SIM_HZ: f64         = 60.0;

/// -------- player --------
pub const PLAYER_WIDTH: f32  = 12.0;
pub const PLAYER_HEIGHT: f32 = 16.0;
pub const PLAYER_SPEED: f32  = 3.0;
pub const PLAYER_SPAWN_X: f32 = 300.0;

/// -------- enemies --------
pub const ENEMY_SIZE: f32    = 16.0;
pub const ENEMY_SPEED: f32   = 2.0;
pub const AGGRO_RADIUS: f32  = 20.0 * TILE_SIZE;
pub const ENEMY_SPAWNS: [(f32, f32); 2] = [(200.0, 100.0), (520.0, 60.0)];

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64        = 0.05;
pub const COLOR_VARIATION_LEVELS: i32   = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.2;
