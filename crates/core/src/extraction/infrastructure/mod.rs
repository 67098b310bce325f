pub mod onnx_face_extractor;
