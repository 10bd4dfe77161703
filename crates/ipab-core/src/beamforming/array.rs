//! Phased array state: configuration, elements and phase computation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::element::ArrayElement;
use super::geometry::{self, ArrayGeometry};
use crate::types::{CoreError, CoreResult};

/// How per-element phases are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseProfile {
    /// Constant gradient: `(i − center) · slope`
    #[default]
    Linear,
    /// Focusing on a point `focus_distance` ahead of the array
    Quadratic,
    /// Independent uniform draws in (−180, 180]
    Random,
    /// Phases are set by hand and left alone
    Custom,
}

impl PhaseProfile {
    pub const ALL: [PhaseProfile; 4] = [
        PhaseProfile::Linear,
        PhaseProfile::Quadratic,
        PhaseProfile::Random,
        PhaseProfile::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseProfile::Linear => "linear",
            PhaseProfile::Quadratic => "quadratic",
            PhaseProfile::Random => "random",
            PhaseProfile::Custom => "custom",
        }
    }
}

impl fmt::Display for PhaseProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhaseProfile::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::invalid_enum("phase profile", s))
    }
}

/// Largest element count accepted by setters, updates and imports
pub const MAX_ELEMENTS: usize = 65_536;

/// Wrap degrees into (−180, 180].
pub fn wrap_phase(deg: f64) -> f64 {
    180.0 - (180.0 - deg).rem_euclid(360.0)
}

/// A phased array and its elements.
///
/// Geometry-affecting setters regenerate the elements, so
/// `elements().len() == num_elements()` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayConfig", into = "ArrayConfig")]
pub struct PhasedArray {
    id: u32,
    name: String,
    geometry: ArrayGeometry,
    num_elements: usize,
    element_spacing: f64,
    curvature: f64,
    frequency: f64,
    propagation_speed: f64,
    position: [f64; 2],
    rotation: f64,
    steering_angle: f64,
    focus_distance: f64,
    phase_profile: PhaseProfile,
    phase_slope: f64,
    elements: Vec<ArrayElement>,
}

impl Default for PhasedArray {
    fn default() -> Self {
        let mut array = Self {
            id: 0,
            name: "Array 1".to_string(),
            geometry: ArrayGeometry::Linear,
            num_elements: 8,
            element_spacing: 0.5,
            curvature: 1.0,
            frequency: 300e6,
            propagation_speed: 3.0e8,
            position: [0.0, 0.0],
            rotation: 0.0,
            steering_angle: 0.0,
            focus_distance: 5.0,
            phase_profile: PhaseProfile::Linear,
            phase_slope: 0.0,
            elements: Vec::new(),
        };
        array.initialize_elements();
        array
    }
}

impl PhasedArray {
    /// Default array with the given id and name
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> ArrayGeometry {
        self.geometry
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn element_spacing(&self) -> f64 {
        self.element_spacing
    }

    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Base carrier frequency in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Propagation speed in m/s
    pub fn propagation_speed(&self) -> f64 {
        self.propagation_speed
    }

    pub fn wavelength(&self) -> f64 {
        self.propagation_speed / self.frequency
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn steering_angle(&self) -> f64 {
        self.steering_angle
    }

    pub fn focus_distance(&self) -> f64 {
        self.focus_distance
    }

    pub fn phase_profile(&self) -> PhaseProfile {
        self.phase_profile
    }

    pub fn phase_slope(&self) -> f64 {
        self.phase_slope
    }

    pub fn elements(&self) -> &[ArrayElement] {
        &self.elements
    }

    /// Mutable access to individual elements. The count cannot change.
    pub fn elements_mut(&mut self) -> &mut [ArrayElement] {
        &mut self.elements
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut ArrayElement> {
        self.elements.get_mut(index)
    }

    pub fn active_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_active).count()
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_geometry(&mut self, geometry: ArrayGeometry) {
        self.geometry = geometry;
        self.initialize_elements();
    }

    pub fn set_num_elements(&mut self, n: usize) -> CoreResult<()> {
        validate_count(n)?;
        self.num_elements = n;
        self.initialize_elements();
        Ok(())
    }

    pub fn set_element_spacing(&mut self, spacing: f64) {
        self.element_spacing = spacing;
        self.initialize_elements();
    }

    pub fn set_curvature(&mut self, curvature: f64) {
        self.curvature = curvature;
        self.initialize_elements();
    }

    pub fn set_position(&mut self, position: [f64; 2]) {
        self.position = position;
        self.initialize_elements();
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.initialize_elements();
    }

    pub fn set_frequency(&mut self, frequency: f64) -> CoreResult<()> {
        validate_positive("frequency", frequency)?;
        self.frequency = frequency;
        Ok(())
    }

    pub fn set_propagation_speed(&mut self, speed: f64) -> CoreResult<()> {
        validate_positive("propagation_speed", speed)?;
        self.propagation_speed = speed;
        Ok(())
    }

    pub fn set_steering_angle(&mut self, angle: f64) {
        self.steering_angle = angle;
    }

    pub fn set_focus_distance(&mut self, distance: f64) {
        self.focus_distance = distance;
    }

    pub fn set_phase_profile(&mut self, profile: PhaseProfile) {
        self.phase_profile = profile;
    }

    pub fn set_phase_slope(&mut self, slope: f64) {
        self.phase_slope = slope;
    }

    // -----------------------------------------------------------------------
    // Elements and phases
    // -----------------------------------------------------------------------

    /// Regenerate every element from the geometry. Manual overrides are lost.
    pub fn initialize_elements(&mut self) {
        let local = geometry::local_positions(
            self.geometry,
            self.num_elements,
            self.element_spacing,
            self.curvature,
        );
        self.elements = local
            .into_iter()
            .enumerate()
            .map(|(i, p)| ArrayElement::new(i, geometry::place(p, self.rotation, self.position)))
            .collect();

        tracing::trace!(
            id = self.id,
            geometry = %self.geometry,
            count = self.elements.len(),
            "Initialized elements"
        );
    }

    /// Compute phases, drawing from the thread RNG for the random profile.
    pub fn compute_phases(&mut self) {
        self.compute_phases_with(&mut rand::thread_rng());
    }

    /// Compute phases with an explicit RNG (used only by the random profile).
    pub fn compute_phases_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.phase_profile == PhaseProfile::Custom {
            return;
        }

        let n = self.elements.len();
        let center = (n as f64 - 1.0) / 2.0;
        let [x0, y0] = self.position;
        let (sin_r, cos_r) = self.rotation.to_radians().sin_cos();
        let focal = [
            x0 - self.focus_distance * sin_r,
            y0 + self.focus_distance * cos_r,
        ];
        let steer = geometry::direction(self.steering_angle);
        let (f, c) = (self.frequency, self.propagation_speed);

        for (i, element) in self.elements.iter_mut().enumerate() {
            let wavelength = element.wavelength(f, c);

            let mut phase = match self.phase_profile {
                PhaseProfile::Linear => (i as f64 - center) * self.phase_slope,
                PhaseProfile::Quadratic => {
                    -360.0 * element.distance_to(focal[0], focal[1]) / wavelength
                }
                PhaseProfile::Random => 180.0 - rng.gen_range(0.0..360.0),
                PhaseProfile::Custom => element.phase,
            };

            if self.steering_angle != 0.0 {
                let projection = (element.x() - x0) * steer[0] + (element.y() - y0) * steer[1];
                phase -= 360.0 * projection / wavelength;
            }

            element.phase = wrap_phase(phase);
        }
    }

    // -----------------------------------------------------------------------
    // Bulk updates
    // -----------------------------------------------------------------------

    /// Apply a partial update.
    ///
    /// Validation happens before anything is changed. Geometry changes
    /// regenerate the elements, then element overrides are applied and phases
    /// recomputed. Phase overrides are written last so they survive the
    /// recomputation.
    pub fn apply_update(&mut self, update: &ArrayUpdate) -> CoreResult<()> {
        if let Some(n) = update.num_elements {
            validate_count(n)?;
        }
        if let Some(f) = update.frequency {
            validate_positive("frequency", f)?;
        }
        if let Some(v) = update.propagation_speed {
            validate_positive("propagation_speed", v)?;
        }

        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(f) = update.frequency {
            self.frequency = f;
        }
        if let Some(v) = update.propagation_speed {
            self.propagation_speed = v;
        }
        if let Some(a) = update.steering_angle {
            self.steering_angle = a;
        }
        if let Some(d) = update.focus_distance {
            self.focus_distance = d;
        }
        if let Some(p) = update.phase_profile {
            self.phase_profile = p;
        }
        if let Some(s) = update.phase_slope {
            self.phase_slope = s;
        }

        let mut regenerate = false;
        if let Some(g) = update.geometry {
            regenerate |= g != self.geometry;
            self.geometry = g;
        }
        if let Some(n) = update.num_elements {
            regenerate |= n != self.num_elements;
            self.num_elements = n;
        }
        if let Some(d) = update.element_spacing {
            regenerate |= d != self.element_spacing;
            self.element_spacing = d;
        }
        if let Some(c) = update.curvature {
            regenerate |= c != self.curvature;
            self.curvature = c;
        }
        if let Some(p) = update.position {
            regenerate |= p != self.position;
            self.position = p;
        }
        if let Some(r) = update.rotation {
            regenerate |= r != self.rotation;
            self.rotation = r;
        }
        if regenerate {
            self.initialize_elements();
        }

        for ov in &update.elements {
            let Some(element) = self.elements.get_mut(ov.index) else {
                tracing::debug!(index = ov.index, "Ignoring override for missing element");
                continue;
            };
            if let Some(p) = ov.position {
                element.position = p;
            }
            if let Some(a) = ov.amplitude {
                element.amplitude = a;
            }
            if let Some(active) = ov.is_active {
                element.is_active = active;
            }
            if ov.frequency.is_some() {
                element.frequency = ov.frequency;
            }
        }

        self.compute_phases();

        for ov in &update.elements {
            if let (Some(element), Some(phase)) = (self.elements.get_mut(ov.index), ov.phase) {
                element.phase = wrap_phase(phase);
            }
        }

        tracing::debug!(id = self.id, regenerate, overrides = update.elements.len(), "Applied array update");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Full configuration including elements
    pub fn to_config(&self) -> ArrayConfig {
        ArrayConfig::from(self.clone())
    }

    /// Build from a JSON document. Unknown geometry or phase-profile strings
    /// fail with `InvalidEnumValue`; any other problem is
    /// `MalformedConfiguration`.
    pub fn from_value(value: &serde_json::Value) -> CoreResult<Self> {
        check_enum_field::<ArrayGeometry>(value, "geometry")?;
        check_enum_field::<PhaseProfile>(value, "phase_profile")?;
        let config = ArrayConfig::deserialize(value)?;
        Self::try_from(config)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn validate_count(n: usize) -> CoreResult<()> {
    if n == 0 {
        return Err(CoreError::MalformedConfiguration(
            "num_elements must be at least 1".to_string(),
        ));
    }
    if n > MAX_ELEMENTS {
        return Err(CoreError::MalformedConfiguration(format!(
            "num_elements must be at most {}, got {}",
            MAX_ELEMENTS, n
        )));
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> CoreResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::MalformedConfiguration(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}

fn check_enum_field<T: FromStr<Err = CoreError>>(
    value: &serde_json::Value,
    field: &str,
) -> CoreResult<()> {
    match value.get(field) {
        None | Some(serde_json::Value::Null) => Ok(()),
        Some(serde_json::Value::String(s)) => s.parse::<T>().map(|_| ()),
        Some(other) => Err(CoreError::MalformedConfiguration(format!(
            "{} must be a string, got {}",
            field, other
        ))),
    }
}

/// Serialized form of a [`PhasedArray`]. Every field is optional on input
/// and defaults to the value of `PhasedArray::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    pub id: u32,
    pub name: String,
    pub geometry: ArrayGeometry,
    pub num_elements: usize,
    pub element_spacing: f64,
    pub curvature: f64,
    pub frequency: f64,
    pub propagation_speed: f64,
    pub position: [f64; 2],
    pub rotation: f64,
    pub steering_angle: f64,
    pub focus_distance: f64,
    pub phase_profile: PhaseProfile,
    pub phase_slope: f64,
    /// Regenerated when absent or when the count disagrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ArrayElement>>,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        let mut config = ArrayConfig::from(PhasedArray::default());
        config.elements = None;
        config
    }
}

impl From<PhasedArray> for ArrayConfig {
    fn from(a: PhasedArray) -> Self {
        Self {
            id: a.id,
            name: a.name,
            geometry: a.geometry,
            num_elements: a.num_elements,
            element_spacing: a.element_spacing,
            curvature: a.curvature,
            frequency: a.frequency,
            propagation_speed: a.propagation_speed,
            position: a.position,
            rotation: a.rotation,
            steering_angle: a.steering_angle,
            focus_distance: a.focus_distance,
            phase_profile: a.phase_profile,
            phase_slope: a.phase_slope,
            elements: Some(a.elements),
        }
    }
}

impl TryFrom<ArrayConfig> for PhasedArray {
    type Error = CoreError;

    fn try_from(c: ArrayConfig) -> Result<Self, Self::Error> {
        validate_count(c.num_elements)?;
        validate_positive("frequency", c.frequency)?;
        validate_positive("propagation_speed", c.propagation_speed)?;

        let mut array = PhasedArray {
            id: c.id,
            name: c.name,
            geometry: c.geometry,
            num_elements: c.num_elements,
            element_spacing: c.element_spacing,
            curvature: c.curvature,
            frequency: c.frequency,
            propagation_speed: c.propagation_speed,
            position: c.position,
            rotation: c.rotation,
            steering_angle: c.steering_angle,
            focus_distance: c.focus_distance,
            phase_profile: c.phase_profile,
            phase_slope: c.phase_slope,
            elements: Vec::new(),
        };

        match c.elements {
            Some(elements) if elements.len() == array.num_elements => {
                array.elements = elements;
            }
            stored => {
                if let Some(stored) = stored {
                    tracing::warn!(
                        expected = array.num_elements,
                        got = stored.len(),
                        "Element count mismatch, regenerating"
                    );
                }
                array.initialize_elements();
                array.compute_phases();
            }
        }

        Ok(array)
    }
}

/// Partial update of a [`PhasedArray`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayUpdate {
    pub name: Option<String>,
    pub geometry: Option<ArrayGeometry>,
    pub num_elements: Option<usize>,
    pub element_spacing: Option<f64>,
    pub curvature: Option<f64>,
    pub frequency: Option<f64>,
    pub propagation_speed: Option<f64>,
    pub position: Option<[f64; 2]>,
    pub rotation: Option<f64>,
    pub steering_angle: Option<f64>,
    pub focus_distance: Option<f64>,
    pub phase_profile: Option<PhaseProfile>,
    pub phase_slope: Option<f64>,
    pub elements: Vec<ElementOverride>,
}

/// Manual change to one element, addressed by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementOverride {
    pub index: usize,
    pub phase: Option<f64>,
    pub amplitude: Option<f64>,
    pub is_active: Option<bool>,
    pub frequency: Option<f64>,
    pub position: Option<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_array() {
        let array = PhasedArray::default();
        assert_eq!(array.num_elements(), 8);
        assert_eq!(array.elements().len(), 8);
        assert!((array.wavelength() - 1.0).abs() < 1e-12);
        assert_eq!(array.name(), "Array 1");
    }

    #[test]
    fn test_wrap_phase() {
        assert_eq!(wrap_phase(180.0), 180.0);
        assert_eq!(wrap_phase(-180.0), 180.0);
        assert!((wrap_phase(190.0) + 170.0).abs() < 1e-12);
        assert!((wrap_phase(-190.0) - 170.0).abs() < 1e-12);
        assert!((wrap_phase(720.0 + 45.0) - 45.0).abs() < 1e-9);
        assert_eq!(wrap_phase(0.0), 0.0);
    }

    #[test]
    fn test_linear_symmetric_about_position() {
        let mut array = PhasedArray::default();
        array.set_position([3.0, -2.0]);
        let els = array.elements();
        let n = els.len();
        for i in 0..n / 2 {
            let a = els[i].position;
            let b = els[n - 1 - i].position;
            assert!(((a[0] + b[0]) / 2.0 - 3.0).abs() < 1e-12);
            assert!(((a[1] + b[1]) / 2.0 + 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_count_after_changes() {
        let mut array = PhasedArray::default();
        for geometry in ArrayGeometry::ALL {
            array.set_geometry(geometry);
            array.set_num_elements(13).unwrap();
            assert_eq!(array.elements().len(), 13);
        }
        assert!(array.set_num_elements(0).is_err());
        assert_eq!(array.elements().len(), 13);
    }

    #[test]
    fn test_geometry_change_discards_overrides() {
        let mut array = PhasedArray::default();
        array.elements_mut()[2].amplitude = 0.1;
        array.elements_mut()[2].is_active = false;
        array.set_rotation(45.0);
        assert_eq!(array.elements()[2].amplitude, 1.0);
        assert!(array.elements()[2].is_active);
    }

    #[test]
    fn test_linear_slope_phases() {
        let mut array = PhasedArray::default();
        array.set_phase_slope(20.0);
        array.compute_phases();
        let phases: Vec<f64> = array.elements().iter().map(|e| e.phase).collect();
        assert!((phases[0] + 70.0).abs() < 1e-9);
        assert!((phases[7] - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_steering_phase_gradient() {
        // λ/2 spacing, 30° steering: neighbours differ by 360·0.5·sin30 = 90°
        let mut array = PhasedArray::default();
        array.set_steering_angle(30.0);
        array.compute_phases();
        let els = array.elements();
        for w in els.windows(2) {
            let diff = wrap_phase(w[0].phase - w[1].phase);
            assert!((diff - 90.0).abs() < 1e-9, "diff {}", diff);
        }
    }

    #[test]
    fn test_quadratic_focus_symmetric() {
        let mut array = PhasedArray::default();
        array.set_phase_profile(PhaseProfile::Quadratic);
        array.compute_phases();
        let els = array.elements();
        for i in 0..4 {
            assert!((els[i].phase - els[7 - i].phase).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_phases_seeded() {
        let mut array = PhasedArray::default();
        array.set_phase_profile(PhaseProfile::Random);

        let mut rng = StdRng::seed_from_u64(42);
        array.compute_phases_with(&mut rng);
        let first: Vec<f64> = array.elements().iter().map(|e| e.phase).collect();
        for p in &first {
            assert!(*p > -180.0 && *p <= 180.0);
        }

        let mut rng = StdRng::seed_from_u64(42);
        array.compute_phases_with(&mut rng);
        let second: Vec<f64> = array.elements().iter().map(|e| e.phase).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_profile_keeps_phases() {
        let mut array = PhasedArray::default();
        array.set_phase_profile(PhaseProfile::Custom);
        array.set_steering_angle(20.0);
        array.elements_mut()[1].phase = 33.0;
        array.compute_phases();
        array.compute_phases();
        assert_eq!(array.elements()[1].phase, 33.0);
    }

    #[test]
    fn test_apply_update() {
        let mut array = PhasedArray::default();
        let update = ArrayUpdate {
            num_elements: Some(4),
            phase_slope: Some(10.0),
            elements: vec![
                ElementOverride {
                    index: 1,
                    amplitude: Some(0.5),
                    phase: Some(270.0),
                    ..Default::default()
                },
                ElementOverride {
                    index: 99,
                    is_active: Some(false),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        array.apply_update(&update).unwrap();

        assert_eq!(array.elements().len(), 4);
        assert_eq!(array.elements()[1].amplitude, 0.5);
        assert!((array.elements()[1].phase + 90.0).abs() < 1e-12);
        assert!((array.elements()[0].phase + 15.0).abs() < 1e-12);
        assert_eq!(array.active_count(), 4);
    }

    #[test]
    fn test_apply_update_validates_first() {
        let mut array = PhasedArray::default();
        let update = ArrayUpdate {
            name: Some("changed".into()),
            frequency: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(
            array.apply_update(&update),
            Err(CoreError::MalformedConfiguration(_))
        ));
        assert_eq!(array.name(), "Array 1");
    }

    #[test]
    fn test_element_count_bounded() {
        let mut array = PhasedArray::default();
        assert!(matches!(
            array.set_num_elements(MAX_ELEMENTS + 1),
            Err(CoreError::MalformedConfiguration(_))
        ));
        let update = ArrayUpdate {
            num_elements: Some(usize::MAX),
            ..Default::default()
        };
        assert!(array.apply_update(&update).is_err());
        assert_eq!(array.num_elements(), 8);

        let result = PhasedArray::from_json(r#"{"num_elements": 18446744073709551615}"#);
        assert!(matches!(result, Err(CoreError::MalformedConfiguration(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut array = PhasedArray::new(7, "Sweep");
        array.set_geometry(ArrayGeometry::Curved);
        array.set_curvature(0.3);
        array.set_rotation(12.5);
        array.set_steering_angle(-17.0);
        array.compute_phases();
        array.elements_mut()[3].frequency = Some(310e6);

        let json = array.to_json().unwrap();
        let back = PhasedArray::from_json(&json).unwrap();
        assert_eq!(back, array);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let array = PhasedArray::from_json(r#"{"num_elements": 4, "geometry": "circular"}"#).unwrap();
        assert_eq!(array.num_elements(), 4);
        assert_eq!(array.elements().len(), 4);
        assert_eq!(array.geometry(), ArrayGeometry::Circular);
        assert_eq!(array.frequency(), 300e6);
        assert_eq!(array.name(), "Array 1");
    }

    #[test]
    fn test_element_count_mismatch_regenerates() {
        let json = r#"{"num_elements": 3, "elements": [{"index": 0, "position": [9.0, 9.0]}]}"#;
        let array = PhasedArray::from_json(json).unwrap();
        assert_eq!(array.elements().len(), 3);
        assert!((array.elements()[0].position[0] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_enum_values() {
        assert!(matches!(
            PhasedArray::from_json(r#"{"geometry": "spiral"}"#),
            Err(CoreError::InvalidEnumValue { kind: "geometry", .. })
        ));
        assert!(matches!(
            PhasedArray::from_json(r#"{"phase_profile": "chirp"}"#),
            Err(CoreError::InvalidEnumValue { kind: "phase profile", .. })
        ));
        assert!(matches!(
            PhasedArray::from_json(r#"{"num_elements": "many"}"#),
            Err(CoreError::MalformedConfiguration(_))
        ));
        assert!(matches!(
            PhasedArray::from_json(r#"{"num_elements": 0}"#),
            Err(CoreError::MalformedConfiguration(_))
        ));
        assert!(matches!(
            PhasedArray::from_json("not json"),
            Err(CoreError::MalformedConfiguration(_))
        ));
    }
}
