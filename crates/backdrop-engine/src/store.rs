//! Element storage and the spawn/cull policy.

use rand::Rng;

/// Elements that expire, either by running out of life or by outgrowing a cap.
pub trait Lifetime {
    /// `true` once the element must be removed.
    fn is_expired(&self) -> bool;
}

/// Ordered element collection. Insertion order is draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStore<E> {
    elements: Vec<E>,
}

impl<E> Default for ElementStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ElementStore<E> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> {
        self.elements.iter_mut()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.elements
    }

    pub fn as_mut_slice(&mut self) -> &mut [E] {
        &mut self.elements
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Discard everything and reseed from `elements`.
    pub fn replace(&mut self, elements: impl IntoIterator<Item = E>) {
        self.elements.clear();
        self.elements.extend(elements);
    }

    pub fn spawn(&mut self, element: E) {
        self.elements.push(element);
    }

    /// Spawn, then evict the oldest elements until at most `cap` remain.
    pub fn spawn_evicting(&mut self, element: E, cap: usize) {
        self.elements.push(element);
        self.truncate_oldest(cap);
    }

    /// Remove the oldest elements until at most `max` remain. Never grows the
    /// store. Returns how many were removed.
    pub fn truncate_oldest(&mut self, max: usize) -> usize {
        let excess = self.elements.len().saturating_sub(max);
        self.elements.drain(..excess);
        excess
    }

    /// Remove every element matching `expired`, keeping survivor order.
    /// Returns how many were removed.
    pub fn cull_by(&mut self, mut expired: impl FnMut(&E) -> bool) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !expired(e));
        before - self.elements.len()
    }
}

impl<E: Lifetime> ElementStore<E> {
    /// Remove every expired element.
    pub fn cull(&mut self) -> usize {
        self.cull_by(Lifetime::is_expired)
    }
}

impl<'a, E> IntoIterator for &'a ElementStore<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<'a, E> IntoIterator for &'a mut ElementStore<E> {
    type Item = &'a mut E;
    type IntoIter = std::slice::IterMut<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter_mut()
    }
}

/// When new elements are added to a store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPolicy {
    /// Only seeded elements exist.
    Never,
    /// One Bernoulli trial per frame, while below `cap`.
    Random { probability: f64, cap: usize },
    /// One element per pointer press or click, while below `cap`.
    OnPress { cap: usize },
}

impl SpawnPolicy {
    /// Whether the per-frame trial spawns given the current population.
    pub fn frame_spawn<R: Rng + ?Sized>(&self, population: usize, rng: &mut R) -> bool {
        match *self {
            SpawnPolicy::Random { probability, cap } => {
                population < cap && rng.gen_bool(probability.clamp(0.0, 1.0))
            }
            SpawnPolicy::Never | SpawnPolicy::OnPress { .. } => false,
        }
    }

    /// Whether a pointer press spawns given the current population.
    pub fn press_spawn(&self, population: usize) -> bool {
        match *self {
            SpawnPolicy::OnPress { cap } => population < cap,
            SpawnPolicy::Never | SpawnPolicy::Random { .. } => false,
        }
    }

    pub fn cap(&self) -> Option<usize> {
        match *self {
            SpawnPolicy::Never => None,
            SpawnPolicy::Random { cap, .. } | SpawnPolicy::OnPress { cap } => Some(cap),
        }
    }
}

/// Interval spawning against the host clock, with proportional jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTimer {
    interval_ms: f32,
    jitter: f32,
    last_ms: u64,
}

impl SpawnTimer {
    /// `jitter` is the total spread as a fraction of the interval; `0.5`
    /// draws each wait from `interval * [0.75, 1.25)`.
    pub fn new(interval_ms: f32, jitter: f32) -> Self {
        Self {
            interval_ms,
            jitter,
            last_ms: 0,
        }
    }

    pub fn set_interval(&mut self, interval_ms: f32) {
        self.interval_ms = interval_ms;
    }

    /// Returns `true` when the (jittered) interval has elapsed since the last
    /// firing, and restarts the wait.
    pub fn poll<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        let spread = rng.gen_range(-0.5f32..0.5) * self.interval_ms * self.jitter;
        let wait = (self.interval_ms + spread).max(0.0);
        if now_ms.saturating_sub(self.last_ms) as f32 > wait {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[derive(Debug, Clone, PartialEq)]
    struct Spark {
        id: u32,
        life: f32,
    }

    impl Lifetime for Spark {
        fn is_expired(&self) -> bool {
            self.life <= 0.0
        }
    }

    fn sparks(lives: &[f32]) -> ElementStore<Spark> {
        let mut store = ElementStore::new();
        store.replace(lives.iter().enumerate().map(|(i, &life)| Spark {
            id: i as u32,
            life,
        }));
        store
    }

    #[test]
    fn test_cull_removes_adjacent_expired_elements() {
        // Index-removal during forward iteration would skip the second of
        // two neighbouring expired elements.
        let mut store = sparks(&[1.0, 0.0, -0.2, 0.5, 0.0]);
        assert_eq!(store.cull(), 3);
        let ids: Vec<u32> = store.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 3]);
        assert!(store.iter().all(|s| s.life > 0.0));
    }

    #[test]
    fn test_truncate_oldest_shrinks_but_never_grows() {
        let mut store = sparks(&[1.0; 6]);
        assert_eq!(store.truncate_oldest(4), 2);
        let ids: Vec<u32> = store.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert_eq!(store.truncate_oldest(10), 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_spawn_evicting_drops_oldest() {
        let mut store = sparks(&[1.0, 1.0]);
        store.spawn_evicting(Spark { id: 9, life: 1.0 }, 2);
        let ids: Vec<u32> = store.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 9]);
    }

    #[test]
    fn test_random_policy_respects_cap() {
        let policy = SpawnPolicy::Random {
            probability: 0.3,
            cap: 50,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut store: ElementStore<Spark> = ElementStore::new();
        for frame in 0..10_000u32 {
            for s in store.iter_mut() {
                s.life -= 0.004;
            }
            store.cull();
            if policy.frame_spawn(store.len(), &mut rng) {
                store.spawn(Spark {
                    id: frame,
                    life: 1.0,
                });
            }
            assert!(store.len() <= 50);
        }
        assert!(!store.is_empty());
    }

    #[test]
    fn test_press_policy() {
        let policy = SpawnPolicy::OnPress { cap: 2 };
        assert!(policy.press_spawn(1));
        assert!(!policy.press_spawn(2));
        assert!(!policy.frame_spawn(0, &mut StdRng::seed_from_u64(1)));
        assert_eq!(SpawnPolicy::Never.cap(), None);
    }

    #[test]
    fn test_spawn_timer_fires_once_per_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut timer = SpawnTimer::new(1000.0, 0.5);
        assert!(!timer.poll(500, &mut rng));
        assert!(timer.poll(1300, &mut rng));
        assert!(!timer.poll(1400, &mut rng));
        assert!(timer.poll(2600, &mut rng));
    }
}
