//! Integration tests for omemeta
//!
//! These tests exercise the full document lifecycle: default template,
//! mutation through the accessor layer, serialization and re-parsing.

use omemeta::prelude::*;

/// Route the diagnostic channel through the test harness so refused
/// writes and unit-defaulting notices are visible on failure.
fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn roundtrip_preserves_structure_and_attributes() {
    init_logs();
    let doc = OmeXml::new();
    doc.set_image_count(2).unwrap();
    let image = doc.image(0).unwrap();
    image.set_name("series-0");
    let pixels = image.pixels().unwrap();
    pixels.set_channel_count(3).unwrap();
    pixels.set_physical_size_x(0.25);
    pixels.channel(1).unwrap().set_name("GFP");

    let sa = doc.structured_annotations();
    sa.add_original_metadata("BitsPerSample", "16");

    let text = doc.to_xml().unwrap();
    let reparsed = OmeXml::from_str(&text).unwrap();

    assert_eq!(reparsed.image_count(), 2);
    let image = reparsed.image(0).unwrap();
    assert_eq!(image.name().as_deref(), Some("series-0"));
    let pixels = image.pixels().unwrap();
    assert_eq!(pixels.channel_count(), 3);
    assert_eq!(pixels.physical_size_x().unwrap(), Some(0.25));
    assert_eq!(pixels.physical_size_x_unit().as_deref(), Some("µm"));
    assert_eq!(pixels.channel(1).unwrap().name().as_deref(), Some("GFP"));
    assert_eq!(
        reparsed
            .structured_annotations()
            .original_metadata_value("BitsPerSample")
            .as_deref(),
        Some("16")
    );
}

#[test]
fn serialized_root_declares_all_four_namespaces() {
    let doc = OmeXml::new();
    let text = doc.to_xml().unwrap();
    assert!(text.contains("xmlns:ome=\"http://www.openmicroscopy.org/Schemas/OME/2016-06\""));
    assert!(text.contains("xmlns:sa=\"http://www.openmicroscopy.org/Schemas/SA/2016-06\""));
    assert!(text.contains("xmlns:spw=\"http://www.openmicroscopy.org/Schemas/SPW/2016-06\""));
    assert!(text.contains("xmlns:om=\"openmicroscopy.org/OriginalMetadata\""));
}

#[test]
fn setting_image_count_to_its_current_value_changes_nothing() {
    let doc = OmeXml::new();
    doc.set_image_count(2).unwrap();
    let ids: Vec<_> = (0..2).map(|i| doc.image(i).unwrap().id()).collect();

    doc.set_image_count(2).unwrap();
    assert_eq!(doc.image_count(), 2);
    let after: Vec<_> = (0..2).map(|i| doc.image(i).unwrap().id()).collect();
    assert_eq!(ids, after);
}

#[test]
fn grow_then_shrink_restores_the_original_count() {
    let doc = OmeXml::new();
    let pixels = doc.image(0).unwrap().pixels().unwrap();
    assert_eq!(pixels.channel_count(), 1);

    pixels.set_channel_count(5).unwrap();
    assert_eq!(pixels.channel_count(), 5);
    pixels.set_channel_count(1).unwrap();
    assert_eq!(pixels.channel_count(), 1);

    pixels.set_plane_count(4).unwrap();
    pixels.set_plane_count(0).unwrap();
    assert_eq!(pixels.plane_count(), 0);

    pixels.set_tiffdata_count(3).unwrap();
    pixels.set_tiffdata_count(2).unwrap();
    assert_eq!(pixels.tiffdata_count(), 2);
}

#[test]
fn three_channel_scenario_assigns_distinct_ids_and_samples_per_pixel() {
    let doc = OmeXml::new();
    let pixels = doc.image(0).unwrap().pixels().unwrap();
    pixels.set_channel_count(3).unwrap();

    let mut ids = Vec::new();
    for index in 0..3 {
        let channel = pixels.channel(index).unwrap();
        assert_eq!(channel.samples_per_pixel().unwrap(), Some(1));
        ids.push(channel.id().unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3, "generated channel IDs must be distinct");
}

#[test]
fn wavelength_defaulting_injects_nanometres() {
    let doc = OmeXml::new();
    let pixels = doc.image(0).unwrap().pixels().unwrap();
    let settings = pixels.channel(0).unwrap().light_source_settings();
    assert_eq!(settings.wavelength_unit(), None);
    settings.set_wavelength(500.0).unwrap();
    assert_eq!(settings.wavelength().unwrap(), Some(500.0));
    assert_eq!(settings.wavelength_unit().as_deref(), Some("nm"));

    // An explicit unit is never overwritten by a later value write.
    settings.set_wavelength_unit("µm").unwrap();
    settings.set_wavelength(0.5).unwrap();
    assert_eq!(settings.wavelength_unit().as_deref(), Some("µm"));
}

#[test]
fn attenuation_is_a_percent_fraction() {
    init_logs();
    let doc = OmeXml::new();
    let pixels = doc.image(0).unwrap().pixels().unwrap();
    let settings = pixels.channel(0).unwrap().light_source_settings();

    assert!(settings.set_attenuation(1.5).is_err());
    assert_eq!(settings.attenuation().unwrap(), None);

    settings.set_attenuation(0.5).unwrap();
    assert_eq!(settings.attenuation().unwrap(), Some(0.5));

    // A refused write preserves the prior value.
    assert!(settings.set_attenuation(-0.1).is_err());
    assert_eq!(settings.attenuation().unwrap(), Some(0.5));
}

#[test]
fn rejected_ids_leave_the_prior_value_in_place() {
    let doc = OmeXml::new();
    let image = doc.image(0).unwrap();
    assert_eq!(image.id().as_deref(), Some("Image:0"));

    assert!(image.set_id("Pixels:7").is_err());
    assert!(image.set_id("").is_err());
    assert_eq!(image.id().as_deref(), Some("Image:0"));

    image.set_id("urn:lsid:example.org:Image:7").unwrap();
    assert_eq!(image.id().as_deref(), Some("urn:lsid:example.org:Image:7"));
}

#[test]
fn reference_setters_upsert_and_validate_the_target_kind() {
    let doc = OmeXml::new();
    let image = doc.image(0).unwrap();

    assert_eq!(image.instrument_ref(), None);
    image.set_instrument_ref("Instrument:0").unwrap();
    assert_eq!(image.instrument_ref().as_deref(), Some("Instrument:0"));
    image.set_instrument_ref("Instrument:1").unwrap();
    assert_eq!(image.instrument_ref().as_deref(), Some("Instrument:1"));

    // Only the syntactic form is checked, never target existence.
    assert!(image.set_instrument_ref("Detector:1").is_err());
    assert_eq!(image.instrument_ref().as_deref(), Some("Instrument:1"));

    image.set_objective_settings("Objective:0").unwrap();
    assert_eq!(image.objective_settings().as_deref(), Some("Objective:0"));
}

#[test]
fn roiref_growth_matches_the_canonical_roi_ids() {
    let doc = OmeXml::new();
    doc.set_roi_count(2).unwrap();
    let image = doc.image(0).unwrap();
    image.set_roiref_count(2).unwrap();

    for index in 0..2 {
        let roi_id = doc.roi(index).unwrap().id().unwrap();
        let ref_id = image.roiref(index).unwrap().id().unwrap();
        assert_eq!(roi_id, ref_id);
        assert_eq!(roi_id, format!("ROI:{index}"));
    }
}

#[test]
fn plate_wells_resolve_by_index_coordinates_name_and_id() {
    let doc = OmeXml::new();
    let plate = doc.plates().new_plate("screen-1");
    assert_eq!(doc.plates().len(), 1);
    assert_eq!(plate.name().as_deref(), Some("screen-1"));

    let wells = plate.wells();
    let well = wells.new_well(1, 2);
    well.set_external_description("site of interest");
    assert_eq!(wells.len(), 1);

    // Default conventions: letter rows, number columns.
    assert_eq!(plate.well_name_of(&well).unwrap(), "B03");

    let by_index = wells.get(0).unwrap();
    assert_eq!(by_index.id(), well.id());
    let by_coordinates = wells.by_coordinates(1, 2).unwrap();
    assert_eq!(by_coordinates.id(), well.id());
    let by_name = wells.by_name("B03").unwrap();
    assert_eq!(by_name.id(), well.id());
    let by_id = wells.by_name(well.id().unwrap().as_str()).unwrap();
    assert_eq!(by_id.id(), well.id());

    // A miss resolves to None, never an error.
    assert!(wells.by_name("Z99").is_none());
    assert!(wells.get(5).is_none());
    assert!(wells.by_coordinates(7, 7).is_none());
}

#[test]
fn plate_conventions_apply_per_axis() {
    let doc = OmeXml::new();
    let plate = doc.plates().new_plate("numeric-rows");
    plate.set_row_naming_convention(NamingConvention::Number);
    plate.set_column_naming_convention(NamingConvention::Number);
    let well = plate.wells().new_well(0, 0);
    assert_eq!(plate.well_name_of(&well).unwrap(), "0101");
}

#[test]
fn well_samples_get_fresh_ids_and_sequential_indices() {
    let doc = OmeXml::new();
    let plate = doc.plates().new_plate("sites");
    let well = plate.wells().new_well(0, 0);
    let samples = well.samples();

    let first = samples.new_sample();
    let second = samples.new_sample();
    assert_eq!(samples.len(), 2);
    assert_eq!(first.index().unwrap(), Some(0));
    assert_eq!(second.index().unwrap(), Some(1));
    assert_ne!(first.id(), second.id());

    second.set_image_ref("Image:0").unwrap();
    assert_eq!(second.image_ref().as_deref(), Some("Image:0"));
}

#[test]
fn original_metadata_lookup_is_first_match_wins() {
    let doc = OmeXml::new();
    let sa = doc.structured_annotations();

    let id = sa.add_original_metadata("Make", "Zeiss");
    assert!(sa.contains(&id));
    assert_eq!(sa.original_metadata_value("Make").as_deref(), Some("Zeiss"));
    assert!(sa.has_original_metadata("Make"));

    // Absent keys fall back to the caller's default.
    let fallback = sa
        .original_metadata_value("Model")
        .unwrap_or_else(|| "unknown".to_string());
    assert_eq!(fallback, "unknown");

    // TIFF page names use the conventional derived key.
    sa.add_original_metadata(&omemeta::annotations::page_name_key(0), "page-0");
    assert!(sa.has_original_metadata("PageName #0"));

    // Duplicate keys are legal; the first entry wins on lookup.
    sa.add_original_metadata("Make", "Leica");
    assert_eq!(sa.original_metadata_value("Make").as_deref(), Some("Zeiss"));
    let entries: Vec<_> = sa
        .iter_original_metadata()
        .filter(|(_, key, _)| key == "Make")
        .collect();
    assert_eq!(entries.len(), 2);
}

#[test]
fn original_metadata_survives_serialization() {
    let doc = OmeXml::new();
    doc.structured_annotations()
        .add_original_metadata("PhotometricInterpretation", "RGB");

    let text = doc.to_xml().unwrap();
    let reparsed = OmeXml::from_str(&text).unwrap();
    assert_eq!(
        reparsed
            .structured_annotations()
            .original_metadata_value("PhotometricInterpretation")
            .as_deref(),
        Some("RGB")
    );
}

#[test]
fn parsed_instruments_expose_their_sub_specs() {
    let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<OME xmlns="http://www.openmicroscopy.org/Schemas/OME/2016-06">
  <Instrument ID="Instrument:0">
    <Microscope Manufacturer="Zeiss" Model="Axio" Type="Upright"/>
    <Detector ID="Detector:0" Gain="1.5" Type="CCD"/>
    <Objective ID="Objective:0" LensNA="1.4" NominalMagnification="63"/>
  </Instrument>
  <Image ID="Image:0" Name="i">
    <Pixels ID="Pixels:0" DimensionOrder="XYCZT" Type="uint8" SizeC="1" SizeT="1" SizeX="1" SizeY="1" SizeZ="1">
      <Channel ID="Channel:0:0" SamplesPerPixel="1"/>
    </Pixels>
  </Image>
</OME>"#;
    let doc = OmeXml::from_str(text).unwrap();
    let instrument = doc.instrument(0).unwrap();
    assert_eq!(instrument.id().as_deref(), Some("Instrument:0"));

    let microscope = instrument.microscope().unwrap();
    assert_eq!(microscope.manufacturer().as_deref(), Some("Zeiss"));
    assert_eq!(microscope.microscope_type().as_deref(), Some("Upright"));

    let detector = instrument.detector(0).unwrap();
    assert_eq!(detector.gain().unwrap(), Some(1.5));
    assert_eq!(detector.detector_type().as_deref(), Some("CCD"));
    assert!(instrument.detector(1).is_none());

    let objective = instrument.objective(0).unwrap();
    assert_eq!(objective.lens_na().unwrap(), Some(1.4));
    assert_eq!(objective.nominal_magnification().unwrap(), Some(63.0));
}

#[test]
fn numeric_getters_distinguish_absence_from_garbage() {
    let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<OME xmlns="http://www.openmicroscopy.org/Schemas/OME/2016-06">
  <Image ID="Image:0">
    <Pixels ID="Pixels:0" SizeX="not-a-number">
      <Channel ID="Channel:0:0"/>
    </Pixels>
  </Image>
</OME>"#;
    let doc = OmeXml::from_str(text).unwrap();
    let pixels = doc.image(0).unwrap().pixels().unwrap();
    assert!(pixels.size_x().is_err());
    assert_eq!(pixels.size_y().unwrap(), None);
}
