pub mod face_extractor;
