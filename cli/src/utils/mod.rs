pub mod result_serializer;
