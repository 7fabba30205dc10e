//! Collision resolver: turns collision-begin events into game rules.
//!
//! Physics reports contacts as unordered entity pairs. The resolver looks up
//! both kinds, normalizes them into a [`KindPair`], and dispatches to the
//! single [`CollisionRule`] registered for that pair. The rule receives the
//! two entities in the same order as its pair, so `(Brick, Ball)` and
//! `(Ball, Brick)` are handled identically.
//!
//! # Invariants
//!
//! - Both entities must still be alive; stale contacts are dropped
//! - Nothing is dispatched once the session is terminal
//! - Contacts are processed in delivery order
//!
//! # Available Rules
//!
//! - [`BallBrickRule`]: destroys bricks, scores, advances levels
//! - [`BallPaddleRule`]: steers the ball by where it hit the paddle
//! - [`BallBottomRule`]: takes a life and respawns the ball

mod rules;

pub use rules::{BallBottomRule, BallBrickRule, BallPaddleRule};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, trace};

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::entity::{EntityId, EntityKind};
use crate::error::LevelError;
use crate::level::{Level, LevelLoader};
use crate::physics::Contact;
use crate::session::{GameSession, TickEvents};
use crate::spawn;

/// An unordered pair of entity kinds, stored lowest first.
///
/// ```
/// use breakout_core::entity::EntityKind;
/// use breakout_core::resolver::KindPair;
///
/// assert_eq!(
///     KindPair::new(EntityKind::Brick, EntityKind::Ball),
///     KindPair::new(EntityKind::Ball, EntityKind::Brick),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KindPair {
    first: EntityKind,
    second: EntityKind,
}

impl KindPair {
    /// Creates a normalized pair.
    #[must_use]
    pub fn new(a: EntityKind, b: EntityKind) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// The lower kind.
    #[must_use]
    pub const fn first(&self) -> EntityKind {
        self.first
    }

    /// The higher kind.
    #[must_use]
    pub const fn second(&self) -> EntityKind {
        self.second
    }
}

impl fmt::Display for KindPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.first, self.second)
    }
}

/// Everything a rule may read or mutate while resolving one tick.
pub struct ResolveContext<'a> {
    /// Live entities.
    pub arena: &'a mut Arena,
    /// Score, lives, level.
    pub session: &'a mut GameSession,
    /// Source of the next level on a clear.
    pub levels: &'a LevelLoader,
    /// Gameplay constants.
    pub config: &'a GameConfig,
    /// The level currently on the board.
    pub active_level: &'a mut Level,
    /// Events accumulated this tick.
    pub events: TickEvents,
    /// Set when a level advance was rejected.
    pub level_error: Option<LevelError>,
}

impl<'a> ResolveContext<'a> {
    /// Creates a context with no events recorded.
    pub fn new(
        arena: &'a mut Arena,
        session: &'a mut GameSession,
        levels: &'a LevelLoader,
        config: &'a GameConfig,
        active_level: &'a mut Level,
    ) -> Self {
        Self {
            arena,
            session,
            levels,
            config,
            active_level,
            events: TickEvents::empty(),
            level_error: None,
        }
    }

    /// Loads the level after the current one and spawns its bricks.
    ///
    /// `NotFound` means every level has been cleared: the level index still
    /// advances past the last level and the session is won.
    /// Any other failure aborts the transition: the active level's bricks are
    /// spawned again and the error is kept in [`Self::level_error`].
    pub fn advance_level(&mut self) {
        let current = self.session.current_level();
        let next = current.saturating_add(1);

        match self.levels.load(next) {
            Ok(level) => {
                self.arena.remove_kind(EntityKind::Brick);
                let bricks = spawn::spawn_bricks(self.arena, &level, self.config);
                self.session.begin_level(next, bricks);
                *self.active_level = level;
                self.events |= TickEvents::LEVEL_ADVANCED;
                info!(level = next, bricks, "level advanced");
            }
            Err(err) if err.is_not_found() => {
                self.session.begin_level(next, 0);
                self.session.mark_won();
                self.events |= TickEvents::GAME_WON;
                info!(levels_cleared = next, score = self.session.score(), "game won");
            }
            Err(err) => {
                error!(level = next, error = %err, "level rejected, replaying level {current}");
                self.arena.remove_kind(EntityKind::Brick);
                let bricks = spawn::spawn_bricks(self.arena, self.active_level, self.config);
                self.session.begin_level(current, bricks);
                self.events |= TickEvents::LEVEL_REJECTED;
                self.level_error = Some(err);
            }
        }
    }
}

impl fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("session", &self.session)
            .field("active_level", &self.active_level.index())
            .field("events", &self.events)
            .field("level_error", &self.level_error)
            .finish_non_exhaustive()
    }
}

/// A game rule for one pair of entity kinds.
///
/// # Example
///
/// ```
/// use breakout_core::entity::{EntityId, EntityKind};
/// use breakout_core::resolver::{CollisionRule, KindPair, ResolveContext};
///
/// struct BallWallClick;
///
/// impl CollisionRule for BallWallClick {
///     fn pair(&self) -> KindPair {
///         KindPair::new(EntityKind::Ball, EntityKind::Wall)
///     }
///
///     fn resolve(&self, _ctx: &mut ResolveContext<'_>, _ball: EntityId, _wall: EntityId) {}
/// }
/// ```
pub trait CollisionRule: Send + Sync {
    /// The kinds this rule handles.
    fn pair(&self) -> KindPair;

    /// Applies the rule. `first` has kind `pair().first()`, `second` has kind
    /// `pair().second()`.
    fn resolve(&self, ctx: &mut ResolveContext<'_>, first: EntityId, second: EntityId);
}

/// Dispatch table from [`KindPair`] to [`CollisionRule`].
pub struct CollisionResolver {
    rules: BTreeMap<KindPair, Box<dyn CollisionRule>>,
}

impl fmt::Debug for CollisionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionResolver")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResolver {
    /// Creates a resolver with the Breakout rule set.
    #[must_use]
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        resolver.register(BallBrickRule);
        resolver.register(BallPaddleRule);
        resolver.register(BallBottomRule);
        resolver
    }

    /// Creates a resolver with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Registers `rule`, replacing any rule for the same pair.
    pub fn register(&mut self, rule: impl CollisionRule + 'static) {
        self.rules.insert(rule.pair(), Box::new(rule));
    }

    /// Returns `true` if a rule handles `pair`.
    #[must_use]
    pub fn handles(&self, pair: KindPair) -> bool {
        self.rules.contains_key(&pair)
    }

    /// Dispatches each contact to its rule, in order.
    ///
    /// Returns how many contacts reached a rule.
    pub fn resolve(&self, contacts: &[Contact], ctx: &mut ResolveContext<'_>) -> usize {
        let mut dispatched = 0;

        for (index, contact) in contacts.iter().enumerate() {
            if ctx.session.is_terminal() {
                trace!(dropped = contacts.len() - index, "session terminal, contacts dropped");
                break;
            }

            let (a, b) = contact.pair();
            let (Some(kind_a), Some(kind_b)) = (ctx.arena.kind_of(a), ctx.arena.kind_of(b)) else {
                trace!(a = %a, b = %b, "stale contact ignored");
                continue;
            };

            let pair = KindPair::new(kind_a, kind_b);
            let Some(rule) = self.rules.get(&pair) else {
                continue;
            };

            let (first, second) = if kind_a <= kind_b { (a, b) } else { (b, a) };
            trace!(%pair, first = %first, second = %second, "dispatch");
            rule.resolve(ctx, first, second);
            dispatched += 1;
        }

        dispatched
    }
}
