//! Resource-scoping parameters for ownership checks.
//!
//! A scoped call may carry `user_id`, `place_id` and `review_id`; only the
//! first present one in [`SCOPE_PRECEDENCE`] is ever evaluated.

/// A named resource-scoping parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeParam {
    UserId,
    PlaceId,
    ReviewId,
}

impl ScopeParam {
    pub fn name(&self) -> &'static str {
        match self {
            ScopeParam::UserId => "user_id",
            ScopeParam::PlaceId => "place_id",
            ScopeParam::ReviewId => "review_id",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SCOPE_PRECEDENCE.into_iter().find(|p| p.name() == name)
    }
}

/// Fixed evaluation order. Do not reorder.
pub const SCOPE_PRECEDENCE: [ScopeParam; 3] = [ScopeParam::UserId, ScopeParam::PlaceId, ScopeParam::ReviewId];

/// Raw scoping parameters captured from a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceScope {
    user_id: Option<String>,
    place_id: Option<String>,
    review_id: Option<String>,
}

/// The single parameter selected for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeTarget<'a> {
    pub param: ScopeParam,
    pub value: &'a str,
}

impl ResourceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect scoping parameters from `(name, value)` pairs.
    ///
    /// Unknown names are ignored. If a name repeats, the first value wins, so
    /// callers should feed higher-priority sources (path) before lower ones (query).
    pub fn from_params<'p, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        let mut scope = Self::default();
        for (name, value) in params {
            if let Some(param) = ScopeParam::from_name(name) {
                let slot = scope.slot_mut(param);
                if slot.is_none() {
                    *slot = Some(value.to_string());
                }
            }
        }
        scope
    }

    pub fn with(mut self, param: ScopeParam, value: impl Into<String>) -> Self {
        *self.slot_mut(param) = Some(value.into());
        self
    }

    pub fn get(&self, param: ScopeParam) -> Option<&str> {
        match param {
            ScopeParam::UserId => self.user_id.as_deref(),
            ScopeParam::PlaceId => self.place_id.as_deref(),
            ScopeParam::ReviewId => self.review_id.as_deref(),
        }
    }

    /// First present parameter in precedence order, if any.
    pub fn target(&self) -> Option<ScopeTarget<'_>> {
        for param in SCOPE_PRECEDENCE {
            if let Some(value) = self.get(param) {
                return Some(ScopeTarget { param, value });
            }
        }
        None
    }

    fn slot_mut(&mut self, param: ScopeParam) -> &mut Option<String> {
        match param {
            ScopeParam::UserId => &mut self.user_id,
            ScopeParam::PlaceId => &mut self.place_id,
            ScopeParam::ReviewId => &mut self.review_id,
        }
    }
}
