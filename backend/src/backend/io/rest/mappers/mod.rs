pub mod curriculum_mapper;

pub use curriculum_mapper::CurriculumMapper;
