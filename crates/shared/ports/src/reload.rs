/// Port for collaborators that re-read their configuration on reload
///
/// The registry itself holds no configuration. `BrokerRegistry::reload`
/// only tells subscribers that now is the time to re-read settings and
/// re-register.
pub trait ReloadListener: Send + Sync {
    /// `generation` increases by one on every reload
    fn on_reload(&self, generation: u64);
}
