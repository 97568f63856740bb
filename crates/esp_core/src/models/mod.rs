pub mod arquivo;
pub mod caderno;
pub mod catalogo;
pub mod esp;
pub mod log;
pub mod ponteiro;
pub mod usuario;

pub use arquivo::{ArquivoMeta, ArquivoMidia, DonoArquivo, TipoArquivo};
pub use caderno::{AtualizaCaderno, Caderno, NovoCaderno, StatusCaderno};
pub use catalogo::{Categoria, ItemCatalogo, NovoItemCatalogo};
pub use esp::{AtualizaEsp, ConteudoSecoes, Esp, NovoEsp, PatchSecoes, Selo};
pub use log::{LogAtividade, NovoLog};
pub use ponteiro::{Ponteiro, BUCKET_PADRAO};
pub use usuario::{Perfil, Usuario, UsuarioPublico};
