//! UseCase 層
//!
//! 接続ライフサイクル（connect / join / leave / disconnect）と
//! 書き込み経路のドメインイベント通知を、1 遷移 1 ユースケースで実装します。
//! レジストリ・カウンタ・ブロードキャスタの編成はこの層だけが行います。

pub mod connect_viewer;
pub mod disconnect_viewer;
pub mod join_room;
pub mod leave_room;
pub mod notify_domain_event;

pub use connect_viewer::ConnectViewerUseCase;
pub use disconnect_viewer::DisconnectViewerUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use notify_domain_event::{DomainEventKind, NotifyDomainEventUseCase};
