//! Dutch catalog. Missing entries fall back to English.

pub(super) const CATALOG: &[(&str, &str)] = &[
    ("describe.declaration", "De variabele {{name}} is aangemaakt met de waarde {{value}}."),
    ("describe.constant", "De constante {{name}} is aangemaakt met de waarde {{value}}."),
    ("describe.assignment", "De variabele {{name}} is bijgewerkt naar {{value}}."),
    ("describe.element_assignment", "{{name}}[{{key}}] is ingesteld op {{value}}."),
    ("describe.property_assignment", "De eigenschap {{property}} is ingesteld op {{value}}."),
    ("describe.update", "{{name}} is veranderd naar {{value}}."),
    ("describe.expression", "De expressie is uitgerekend en gaf {{value}}."),
    ("describe.call", "{{name}} is aangeroepen en gaf {{value}} terug."),
    ("describe.log", "{{value}} is gelogd."),
    ("describe.if_true", "De voorwaarde was waar, dus de code in het blok is uitgevoerd."),
    ("describe.if_false", "De voorwaarde was onwaar, dus de code in het blok is overgeslagen."),
    ("describe.loop_true", "De lusvoorwaarde was waar, dus de lus is uitgevoerd."),
    ("describe.loop_false", "De lusvoorwaarde was onwaar, dus de lus is gestopt."),
    ("describe.repeat_iteration", "Dit is herhaling {{iteration}} van {{count}}."),
    ("describe.repeat_empty", "Het aantal herhalingen was 0, dus de lus is nooit uitgevoerd."),
    ("describe.repeat_forever", "Dit is herhaling {{iteration}} van de lus."),
    ("describe.for_each_iteration", "{{name}} is voor deze herhaling ingesteld op {{value}}."),
    ("describe.for_each_empty", "Er was niets om doorheen te lopen, dus de lus is nooit uitgevoerd."),
    ("describe.return", "{{value}} is teruggegeven uit de functie."),
    ("describe.return_empty", "De functie is beëindigd."),
    ("describe.break", "De lus is vroegtijdig verlaten."),
    ("describe.continue", "Door naar de volgende herhaling van de lus."),
    ("describe.pass", "Er is niets gedaan."),
    ("error.syntax.UnknownCharacter", "We herkennen het teken '{{character}}' niet."),
    ("error.syntax.UnknownCharacterInSource", "We herkennen het teken '{{character}}' niet."),
    ("error.syntax.MissingSemicolon", "Je hebt een ';' nodig aan het einde van deze regel."),
    ("error.syntax.MissingExpression", "We verwachtten hier een waarde."),
    ("error.syntax.MissingEndAfterBlockStatement", "Dit blok heeft een 'end' nodig."),
    ("error.syntax.IndentationError", "Inspringen moet in veelvouden van vier spaties."),
    ("error.runtime.TypeCoercionNotAllowed", "'{{operator}}' kan niet gebruikt worden met een {{left}} en een {{right}}."),
    ("error.runtime.TruthinessDisabled", "Hier werd een boolean verwacht, maar het was een {{type}}."),
    ("error.runtime.ShadowingDisabled", "'{{name}}' bestaat al in een buitenste bereik."),
    ("error.runtime.VariableNotDeclared", "'{{name}}' is niet gedeclareerd."),
    ("error.runtime.VariableAlreadyDeclared", "'{{name}}' is al gedeclareerd."),
    ("error.runtime.MaxIterationsReached", "Het programma heeft meer dan {{max}} herhalingen uitgevoerd."),
    ("error.runtime.MaxCallDepthExceeded", "Functies riepen elkaar meer dan {{max}} keer genest aan."),
    ("error.runtime.ZeroDivisionError", "Je kunt niet door nul delen."),
    ("error.runtime.VariableAlreadyDeclaredInScope", "'{{name}}' bestaat al. Gebruik 'change' om de waarde aan te passen."),
];
