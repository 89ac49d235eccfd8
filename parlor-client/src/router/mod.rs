mod subject_router;

pub use subject_router::SubjectRouter;
