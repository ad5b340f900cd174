use crate::{
    entity::{Link, Tower},
    error::RegistryError,
    id::{generate_id, LinkId, TowerId},
    link_mode::{LinkMode, LinkModeEvent, Rejection},
};
use log::{debug, info, warn};
use rfgeo::{geodesy::distance, Envelope};

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Tower(TowerId),
    Link(LinkId),
}

/// In-memory store of towers and links plus UI selection state.
///
/// A single owner mutates the registry; geometry derived from it is
/// recomputed on every request and never cached.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Towers in creation order.
    towers: Vec<Tower>,

    /// Links in creation order.
    links: Vec<Link>,

    selection: Option<Selection>,

    /// Whether the selected link's fresnel envelope is displayed.
    show_zone: bool,

    link_mode: LinkMode,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            towers: Vec::new(),
            links: Vec::new(),
            selection: None,
            show_zone: true,
            link_mode: LinkMode::Idle,
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn tower(&self, id: &TowerId) -> Option<&Tower> {
        self.towers.iter().find(|tower| tower.id() == id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.iter().find(|link| link.id() == id)
    }

    /// Returns every link with `tower` as an endpoint.
    pub fn links_of<'a>(&'a self, tower: &'a TowerId) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |link| link.touches(tower))
    }

    /// Returns true if `a` and `b` are already linked, in either
    /// order.
    pub fn is_linked(&self, a: &TowerId, b: &TowerId) -> bool {
        self.links.iter().any(|link| link.joins(a, b))
    }

    /// Places a new tower and returns its id.
    pub fn add_tower(
        &mut self,
        name: &str,
        lat: f64,
        lon: f64,
        freq_ghz: f64,
    ) -> Result<TowerId, RegistryError> {
        let id = TowerId::from(self.unused_id());
        let tower = Tower::new(id.clone(), name, lat, lon, freq_ghz)?;
        debug!("added tower {id} '{}' at {lat},{lon}", tower.name());
        self.towers.push(tower);
        Ok(id)
    }

    /// Renames and/or retunes a tower.
    ///
    /// Existing links keep the frequency they were created with.
    pub fn edit_tower(
        &mut self,
        id: &TowerId,
        name: &str,
        freq_ghz: f64,
    ) -> Result<(), RegistryError> {
        self.towers
            .iter_mut()
            .find(|tower| tower.id() == id)
            .ok_or_else(|| RegistryError::UnknownTower(id.clone()))?
            .edit(name, freq_ghz)
    }

    /// Removes a tower and every link touching it.
    ///
    /// Returns the removed tower and links. Clears the selection if
    /// any of them was selected, and abandons an in-progress link
    /// from this tower.
    pub fn remove_tower(&mut self, id: &TowerId) -> Result<(Tower, Vec<Link>), RegistryError> {
        let idx = self
            .towers
            .iter()
            .position(|tower| tower.id() == id)
            .ok_or_else(|| RegistryError::UnknownTower(id.clone()))?;

        let (removed_links, kept_links) = std::mem::take(&mut self.links)
            .into_iter()
            .partition::<Vec<_>, _>(|link| link.touches(id));
        self.links = kept_links;
        let tower = self.towers.remove(idx);

        let deselect = match &self.selection {
            Some(Selection::Tower(selected)) => selected == id,
            Some(Selection::Link(selected)) => removed_links.iter().any(|l| l.id() == selected),
            None => false,
        };
        if deselect {
            self.selection = None;
        }
        if self.link_mode.pending() == Some(id) {
            self.link_mode = LinkMode::Armed;
        }

        debug!("removed tower {id} and {} link(s)", removed_links.len());
        Ok((tower, removed_links))
    }

    pub fn remove_link(&mut self, id: &LinkId) -> Result<Link, RegistryError> {
        let idx = self
            .links
            .iter()
            .position(|link| link.id() == id)
            .ok_or_else(|| RegistryError::UnknownLink(id.clone()))?;
        if self.selection == Some(Selection::Link(id.clone())) {
            self.selection = None;
        }
        debug!("removed link {id}");
        Ok(self.links.remove(idx))
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select_tower(&mut self, id: &TowerId) -> Result<(), RegistryError> {
        if self.tower(id).is_none() {
            return Err(RegistryError::UnknownTower(id.clone()));
        }
        self.selection = Some(Selection::Tower(id.clone()));
        Ok(())
    }

    pub fn select_link(&mut self, id: &LinkId) -> Result<(), RegistryError> {
        if self.link(id).is_none() {
            return Err(RegistryError::UnknownLink(id.clone()));
        }
        self.selection = Some(Selection::Link(id.clone()));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn show_zone(&self) -> bool {
        self.show_zone
    }

    pub fn set_show_zone(&mut self, show: bool) {
        self.show_zone = show;
    }

    /// Flips fresnel envelope display and returns the new setting.
    pub fn toggle_zone(&mut self) -> bool {
        self.show_zone = !self.show_zone;
        self.show_zone
    }

    pub fn link_mode(&self) -> &LinkMode {
        &self.link_mode
    }

    /// Arms link mode. Has no effect if already active.
    pub fn enter_link_mode(&mut self) {
        if !self.link_mode.is_active() {
            self.link_mode = LinkMode::Armed;
        }
    }

    /// Leaves link mode, dropping any half-made link.
    pub fn exit_link_mode(&mut self) {
        self.link_mode = LinkMode::Idle;
    }

    /// Flips link mode and returns true if it is now active.
    pub fn toggle_link_mode(&mut self) -> bool {
        if self.link_mode.is_active() {
            self.exit_link_mode();
        } else {
            self.enter_link_mode();
        }
        self.link_mode.is_active()
    }

    /// Handles a click on tower `id`.
    ///
    /// Outside link mode the tower becomes the selection. In link
    /// mode the first click picks one end of a new link and the
    /// second click completes, cancels, or rejects it; every outcome
    /// of a second click returns to [`LinkMode::Armed`].
    pub fn click_tower(&mut self, id: &TowerId) -> Result<LinkModeEvent, RegistryError> {
        let second_ghz = self
            .tower(id)
            .map(Tower::freq_ghz)
            .ok_or_else(|| RegistryError::UnknownTower(id.clone()))?;

        let first_id = match self.link_mode.clone() {
            LinkMode::Idle => {
                self.selection = Some(Selection::Tower(id.clone()));
                return Ok(LinkModeEvent::Selected(id.clone()));
            }
            LinkMode::Armed => {
                self.link_mode = LinkMode::AwaitingSecond(id.clone());
                return Ok(LinkModeEvent::FirstTower(id.clone()));
            }
            LinkMode::AwaitingSecond(first_id) => first_id,
        };

        self.link_mode = LinkMode::Armed;

        if &first_id == id {
            return Ok(LinkModeEvent::Cancelled);
        }

        let first_ghz = self
            .tower(&first_id)
            .map(Tower::freq_ghz)
            .ok_or_else(|| RegistryError::UnknownTower(first_id.clone()))?;

        let rejection = if first_ghz != second_ghz {
            Some(Rejection::FrequencyMismatch {
                first_ghz,
                second_ghz,
            })
        } else if self.is_linked(&first_id, id) {
            Some(Rejection::DuplicateLink(first_id.clone(), id.clone()))
        } else {
            None
        };

        if let Some(rejection) = rejection {
            warn!("link rejected; {rejection}");
            return Ok(LinkModeEvent::Rejected(rejection));
        }

        let link_id = LinkId::from(self.unused_id());
        info!("created link {link_id} between {first_id} and {id} at {first_ghz} GHz");
        self.links
            .push(Link::new(link_id.clone(), first_id, id.clone(), first_ghz));
        Ok(LinkModeEvent::Created(link_id))
    }

    /// Returns the great-circle length of a link, or `None` if the
    /// link or either tower doesn't resolve.
    pub fn link_distance(&self, id: &LinkId) -> Option<f64> {
        let (a, b) = self.endpoints(id)?;
        Some(distance(a.coord(), b.coord()))
    }

    /// Builds the fresnel envelope for a link with `samples`
    /// intervals and an automatic scale factor.
    ///
    /// Returns `None` if the link or either tower doesn't resolve.
    pub fn link_envelope(&self, id: &LinkId, samples: usize) -> Option<Envelope<f64>> {
        let (a, b) = self.endpoints(id)?;
        let freq_ghz = self.link(id)?.freq_ghz();
        Envelope::builder()
            .start(a.coord())
            .end(b.coord())
            .freq_ghz(freq_ghz)
            .samples(samples)
            .build()
            .ok()
    }

    /// Returns the envelope to display, if a link is selected and
    /// zone display is on.
    pub fn selected_envelope(&self, samples: usize) -> Option<Envelope<f64>> {
        match (&self.selection, self.show_zone) {
            (Some(Selection::Link(id)), true) => self.link_envelope(id, samples),
            _ => None,
        }
    }
}

/// Private API.
impl Registry {
    fn endpoints(&self, id: &LinkId) -> Option<(&Tower, &Tower)> {
        let link = self.link(id)?;
        let a = self.tower(link.tower_a());
        let b = self.tower(link.tower_b());
        match (a, b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => {
                debug!("link {id} has a missing endpoint, skipping");
                None
            }
        }
    }

    /// Returns a generated id not used by any tower or link.
    fn unused_id(&self) -> String {
        loop {
            let id = generate_id();
            let taken = self.towers.iter().any(|t| t.id().as_str() == id)
                || self.links.iter().any(|l| l.id().as_str() == id);
            if !taken {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, Selection};
    use crate::{LinkId, LinkMode, LinkModeEvent, Rejection, RegistryError, TowerId};
    use approx::assert_relative_eq;

    /// Returns a registry with three 5.8 GHz towers and one 6 GHz
    /// tower, a few km apart.
    fn registry() -> (Registry, [TowerId; 4]) {
        let mut registry = Registry::new();
        let a = registry.add_tower("Ridge", 44.283, -71.308, 5.8).unwrap();
        let b = registry.add_tower("Summit", 44.256, -71.297, 5.8).unwrap();
        let c = registry.add_tower("Valley", 44.100, -71.200, 5.8).unwrap();
        let d = registry.add_tower("Harbor", 44.050, -71.100, 6.0).unwrap();
        (registry, [a, b, c, d])
    }

    fn link(registry: &mut Registry, a: &TowerId, b: &TowerId) -> LinkModeEvent {
        registry.enter_link_mode();
        registry.click_tower(a).unwrap();
        registry.click_tower(b).unwrap()
    }

    fn created(event: LinkModeEvent) -> LinkId {
        match event {
            LinkModeEvent::Created(id) => id,
            other => panic!("expected a new link, got {other:?}"),
        }
    }

    #[test]
    fn test_add_tower() {
        let (registry, [a, ..]) = registry();
        assert_eq!(registry.towers().len(), 4);
        let tower = registry.tower(&a).unwrap();
        assert_eq!(tower.name(), "Ridge");
        assert_eq!(tower.freq_ghz(), 5.8);
        assert_eq!(registry.towers()[0].id(), &a);
    }

    #[test]
    fn test_add_invalid_tower() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.add_tower("Ridge", 44.0, -71.0, 0.0),
            Err(RegistryError::Frequency(0.0))
        );
        assert!(registry.add_tower("", 44.0, -71.0, 5.8).is_err());
        assert!(registry.towers().is_empty());
    }

    #[test]
    fn test_edit_tower() {
        let (mut registry, [a, b, ..]) = registry();
        let link_id = created(link(&mut registry, &a, &b));
        registry.edit_tower(&a, "Ridge North", 6.0).unwrap();
        let tower = registry.tower(&a).unwrap();
        assert_eq!(tower.name(), "Ridge North");
        assert_eq!(tower.freq_ghz(), 6.0);
        assert_eq!(tower.lat(), 44.283);
        assert_eq!(registry.link(&link_id).unwrap().freq_ghz(), 5.8);

        let missing = TowerId::from("missing");
        assert_eq!(
            registry.edit_tower(&missing, "x", 1.0),
            Err(RegistryError::UnknownTower(missing))
        );
    }

    #[test]
    fn test_create_link() {
        let (mut registry, [a, b, ..]) = registry();
        registry.enter_link_mode();
        assert_eq!(registry.link_mode(), &LinkMode::Armed);
        assert_eq!(
            registry.click_tower(&a).unwrap(),
            LinkModeEvent::FirstTower(a.clone())
        );
        assert_eq!(registry.link_mode(), &LinkMode::AwaitingSecond(a.clone()));

        let link_id = created(registry.click_tower(&b).unwrap());
        assert_eq!(registry.link_mode(), &LinkMode::Armed);
        let link = registry.link(&link_id).unwrap();
        assert_eq!(link.tower_a(), &a);
        assert_eq!(link.tower_b(), &b);
        assert_eq!(link.freq_ghz(), 5.8);
        assert_eq!(registry.links().len(), 1);
    }

    #[test]
    fn test_frequency_mismatch_is_rejected() {
        let (mut registry, [a, _, _, d]) = registry();
        assert_eq!(
            link(&mut registry, &a, &d),
            LinkModeEvent::Rejected(Rejection::FrequencyMismatch {
                first_ghz: 5.8,
                second_ghz: 6.0,
            })
        );
        assert!(registry.links().is_empty());
        assert_eq!(registry.link_mode(), &LinkMode::Armed);
    }

    #[test]
    fn test_same_tower_cancels() {
        let (mut registry, [a, ..]) = registry();
        assert_eq!(link(&mut registry, &a, &a), LinkModeEvent::Cancelled);
        assert!(registry.links().is_empty());
        assert_eq!(registry.link_mode(), &LinkMode::Armed);
    }

    #[test]
    fn test_duplicate_link_is_rejected() {
        let (mut registry, [a, b, ..]) = registry();
        created(link(&mut registry, &a, &b));
        assert_eq!(
            link(&mut registry, &b, &a),
            LinkModeEvent::Rejected(Rejection::DuplicateLink(b.clone(), a.clone()))
        );
        assert_eq!(registry.links().len(), 1);
        assert!(registry.is_linked(&a, &b));
    }

    #[test]
    fn test_exit_link_mode_clears_pending() {
        let (mut registry, [a, b, ..]) = registry();
        registry.enter_link_mode();
        registry.click_tower(&a).unwrap();
        registry.exit_link_mode();
        assert_eq!(registry.link_mode(), &LinkMode::Idle);

        // Clicks select again once link mode is off.
        assert_eq!(
            registry.click_tower(&b).unwrap(),
            LinkModeEvent::Selected(b.clone())
        );
        assert_eq!(registry.selection(), Some(&Selection::Tower(b)));
        assert!(registry.links().is_empty());
    }

    #[test]
    fn test_toggle_link_mode() {
        let (mut registry, [a, ..]) = registry();
        assert!(registry.toggle_link_mode());
        registry.click_tower(&a).unwrap();
        // Re-entering doesn't drop the pending tower.
        registry.enter_link_mode();
        assert_eq!(registry.link_mode().pending(), Some(&a));
        assert!(!registry.toggle_link_mode());
        assert_eq!(registry.link_mode(), &LinkMode::Idle);
    }

    #[test]
    fn test_click_unknown_tower() {
        let (mut registry, _) = registry();
        registry.enter_link_mode();
        let missing = TowerId::from("missing");
        assert_eq!(
            registry.click_tower(&missing),
            Err(RegistryError::UnknownTower(missing))
        );
        assert_eq!(registry.link_mode(), &LinkMode::Armed);
    }

    #[test]
    fn test_remove_tower_cascades() {
        let (mut registry, [a, b, c, _]) = registry();
        let ab = created(link(&mut registry, &a, &b));
        let ac = created(link(&mut registry, &a, &c));
        let bc = created(link(&mut registry, &b, &c));

        let (tower, removed) = registry.remove_tower(&a).unwrap();
        assert_eq!(tower.id(), &a);
        let mut removed: Vec<_> = removed.iter().map(|l| l.id().clone()).collect();
        removed.sort();
        let mut expected = vec![ab, ac];
        expected.sort();
        assert_eq!(removed, expected);

        assert!(registry.tower(&a).is_none());
        assert_eq!(registry.towers().len(), 3);
        assert_eq!(registry.links().len(), 1);
        assert_eq!(registry.links()[0].id(), &bc);
        assert_eq!(registry.links_of(&b).count(), 1);
    }

    #[test]
    fn test_remove_tower_clears_selection() {
        let (mut registry, [a, b, c, _]) = registry();
        let ab = created(link(&mut registry, &a, &b));
        registry.exit_link_mode();

        registry.select_link(&ab).unwrap();
        registry.remove_tower(&b).unwrap();
        assert_eq!(registry.selection(), None);
        assert!(registry.selected_envelope(50).is_none());

        registry.select_tower(&c).unwrap();
        registry.remove_tower(&a).unwrap();
        assert_eq!(registry.selection(), Some(&Selection::Tower(c.clone())));
        registry.remove_tower(&c).unwrap();
        assert_eq!(registry.selection(), None);
    }

    #[test]
    fn test_remove_pending_tower_rearms() {
        let (mut registry, [a, ..]) = registry();
        registry.enter_link_mode();
        registry.click_tower(&a).unwrap();
        registry.remove_tower(&a).unwrap();
        assert_eq!(registry.link_mode(), &LinkMode::Armed);
    }

    #[test]
    fn test_remove_link() {
        let (mut registry, [a, b, ..]) = registry();
        let ab = created(link(&mut registry, &a, &b));
        registry.select_link(&ab).unwrap();
        let removed = registry.remove_link(&ab).unwrap();
        assert_eq!(removed.id(), &ab);
        assert!(registry.links().is_empty());
        assert_eq!(registry.selection(), None);
        assert_eq!(
            registry.remove_link(&ab),
            Err(RegistryError::UnknownLink(ab))
        );
        assert_eq!(registry.towers().len(), 4);
    }

    #[test]
    fn test_link_distance() {
        let (mut registry, [a, b, ..]) = registry();
        let ab = created(link(&mut registry, &a, &b));
        let expected = rfgeo::distance(
            registry.tower(&a).unwrap().coord(),
            registry.tower(&b).unwrap().coord(),
        );
        assert_relative_eq!(registry.link_distance(&ab).unwrap(), expected);
        assert!(registry.link_distance(&LinkId::from("missing")).is_none());
    }

    #[test]
    fn test_selected_envelope() {
        let (mut registry, [a, b, ..]) = registry();
        let ab = created(link(&mut registry, &a, &b));
        assert!(registry.selected_envelope(50).is_none());

        registry.select_link(&ab).unwrap();
        let envelope = registry.selected_envelope(50).unwrap();
        assert_eq!(envelope.ring.len(), 102);
        assert_relative_eq!(envelope.distance_m, registry.link_distance(&ab).unwrap());
        assert_relative_eq!(
            envelope.max_radius_m * envelope.scale,
            0.02 * envelope.distance_m,
            max_relative = 1e-12
        );

        assert!(!registry.toggle_zone());
        assert!(registry.selected_envelope(50).is_none());
        registry.set_show_zone(true);
        assert!(registry.selected_envelope(10).is_some());
    }

    #[test]
    fn test_dangling_link_is_skipped() {
        let (mut registry, [a, b, ..]) = registry();
        let ab = created(link(&mut registry, &a, &b));
        // Simulate a half-finished cascade.
        registry.towers.retain(|tower| tower.id() != &b);
        assert!(registry.link_envelope(&ab, 50).is_none());
        assert!(registry.link_distance(&ab).is_none());
    }
}
