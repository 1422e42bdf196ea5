use kinematics::{
    BicycleModelConfig, DynamicsModel, DynamicsModelManager, KinematicsError, ModelRegistry,
    ModelSpec,
};

fn short_vehicle() -> ModelSpec {
    ModelSpec::bicycle("ShortVehicle", &BicycleModelConfig::default()).unwrap()
}

fn long_vehicle() -> ModelSpec {
    let config = BicycleModelConfig {
        front_overhang: 1.2,
        wheelbase: 4.5,
        rear_overhang: 1.5,
        width: 2.5,
        ..BicycleModelConfig::default()
    };
    ModelSpec::bicycle("LongVehicle", &config).unwrap()
}

#[test]
fn empty_configuration_is_fatal() {
    let registry = ModelRegistry::with_builtin();
    assert!(matches!(
        DynamicsModelManager::new(&registry, &[]),
        Err(KinematicsError::NoModels)
    ));
}

#[test]
fn unknown_type_is_fatal() {
    let registry = ModelRegistry::with_builtin();
    let mut spec = short_vehicle();
    spec.type_tag = "HovercraftModel".into();
    assert!(matches!(
        DynamicsModelManager::new(&registry, &[spec]),
        Err(KinematicsError::UnknownModelType(_))
    ));
}

#[test]
fn unknown_parameter_is_rejected() {
    let registry = ModelRegistry::with_builtin();
    let mut spec = short_vehicle();
    spec.params.insert("max_lat_acc".into(), serde_json::json!(2.0));
    assert!(matches!(
        DynamicsModelManager::new(&registry, &[spec]),
        Err(KinematicsError::InvalidConfig(_))
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let registry = ModelRegistry::with_builtin();
    let specs = [short_vehicle(), short_vehicle()];
    assert!(matches!(
        DynamicsModelManager::new(&registry, &specs),
        Err(KinematicsError::Configuration(_))
    ));
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ModelRegistry::with_builtin();
    fn never(_: &serde_json::Value) -> Result<Box<dyn DynamicsModel>, KinematicsError> {
        Err(KinematicsError::Unimplemented("never"))
    }
    assert!(registry.register("BicycleModel", never).is_err());
    assert!(registry.register("Never", never).is_ok());
    assert!(registry.contains("Never"));
}

#[test]
fn select_by_name() {
    let registry = ModelRegistry::with_builtin();
    let mut manager =
        DynamicsModelManager::new(&registry, &[short_vehicle(), long_vehicle()]).unwrap();
    assert_eq!(manager.select_by_name("LongVehicle").unwrap(), 1);
    assert_eq!(manager.sampled_name(), "LongVehicle");
    assert_eq!(manager.sampled().dynamics_model_observation()[1], 4.5);
    assert!(matches!(
        manager.select_by_name("Truck"),
        Err(KinematicsError::UnknownModelName(_))
    ));
}

#[test]
fn sampling_is_seeded_and_weighted() {
    let registry = ModelRegistry::with_builtin();
    let specs = [short_vehicle().with_weight(3.0), long_vehicle()];
    let mut a = DynamicsModelManager::new(&registry, &specs).unwrap();
    let mut b = DynamicsModelManager::new(&registry, &specs).unwrap();
    let mut rng_a = fastrand::Rng::with_seed(11);
    let mut rng_b = fastrand::Rng::with_seed(11);

    let mut counts = [0_usize; 2];
    for _ in 0..4000 {
        let i = a.sample(&mut rng_a);
        assert_eq!(i, b.sample(&mut rng_b));
        counts[i] += 1;
    }
    // expected split is 3000 / 1000
    assert!(counts[0] > 2700 && counts[0] < 3300, "counts={counts:?}");
}

#[test]
fn non_positive_weight_is_rejected() {
    let registry = ModelRegistry::with_builtin();
    let specs = [short_vehicle().with_weight(0.0)];
    assert!(DynamicsModelManager::new(&registry, &specs).is_err());
}

#[test]
fn spec_parses_from_json() {
    let json = r#"{
        "type": "BicycleModel",
        "name": "ShortVehicle",
        "front_overhang": 0.9,
        "wheelbase": 2.7,
        "rear_overhang": 0.9,
        "width": 1.8,
        "action_space_lb": [-3.0, -0.5235987755983],
        "action_space_ub": [3.0, 0.5235987755983]
    }"#;
    let spec: ModelSpec = serde_json::from_str(json).unwrap();
    assert_eq!(spec.display_name(), "ShortVehicle");
    let registry = ModelRegistry::with_builtin();
    let manager = DynamicsModelManager::new(&registry, &[spec]).unwrap();
    assert_eq!(manager.action_space().len(), 2);
    assert_eq!(manager.state_observation_space().len(), 1);
    assert_eq!(manager.dynamics_model_observation_space().len(), 5);
    assert_eq!(manager.all_hyper_parameters().len(), 1);
    assert!(manager.info().contains("ShortVehicle"));
}
