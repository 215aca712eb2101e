pub mod account_mapping;
pub mod company;
pub mod cow;
pub mod depreciation_setting;
pub mod disposition;
pub mod journal_entry;
pub mod journal_line;
pub mod processing_log;

// Re-export for easier access
pub use account_mapping::{
    AccountRole, ActiveModel as AccountMappingActiveModel, Entity as AccountMapping,
    Model as AccountMappingModel, UpsertAccountMappingInput,
};
pub use company::{
    ActiveModel as CompanyActiveModel, CreateCompanyInput, Entity as Company,
    Model as CompanyModel,
};
pub use cow::{
    AcquisitionType, ActiveModel as CowActiveModel, CowStatus, CreateCowInput, Entity as Cow,
    Model as CowModel,
};
pub use depreciation_setting::{
    ActiveModel as DepreciationSettingActiveModel, Entity as DepreciationSetting,
    Model as DepreciationSettingModel, ProcessingMode, UpsertDepreciationSettingsInput,
};
pub use disposition::{
    ActiveModel as DispositionActiveModel, CreateDispositionInput, DispositionType,
    Entity as Disposition, Model as DispositionModel,
};
pub use journal_entry::{
    ActiveModel as JournalEntryActiveModel, Entity as JournalEntry, EntryStatus, EntryType,
    JournalEntryFilter, JournalEntryWithLines, Model as JournalEntryModel,
};
pub use journal_line::{
    ActiveModel as JournalLineActiveModel, Entity as JournalLine, LineType,
    Model as JournalLineModel,
};
pub use processing_log::{
    ActiveModel as ProcessingLogActiveModel, Entity as ProcessingLog, JobStatus,
    Model as ProcessingLogModel,
};
